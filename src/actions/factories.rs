//! Factory functions for common edits.
//!
//! Every factory validates its preconditions first and only then builds its
//! group, and building the group performs it: the returned action has already
//! taken effect. Nothing is pushed to a [`History`](super::History); callers
//! record the result themselves. A factory that returns an error has changed
//! nothing.

use super::action::Action;
use super::context::DesignerContext;
use super::group::GroupAction;
use crate::core::circuit::Circuit;
use crate::core::components::{Component, ComponentKind, IcDefinition, SELECT_BOUNDS};
use crate::core::connections::ConnectionValidator;
use crate::core::errors::{CircuitError, Result};
use crate::core::types::{ComponentId, IcId, InputPortRef, OutputPortRef, Position, WireId};
use indexmap::{IndexMap, IndexSet};
use log::debug;

fn require<'a>(ctx: &'a DesignerContext, id: ComponentId) -> Result<&'a Component> {
    ctx.circuit
        .component(id)
        .ok_or_else(|| CircuitError::NotInCircuit(format!("Component {} not found", id)))
}

/// Place a component built with [`Circuit::create_component`] or
/// [`Circuit::create_ic_component`]
pub fn create_place_action(
    ctx: &mut DesignerContext,
    component: Component,
) -> Result<(GroupAction, ComponentId)> {
    let id = component.id();
    if ctx.circuit.contains_component(id) {
        return Err(CircuitError::ActionState(format!(
            "Component {} is already placed",
            id
        )));
    }
    if let ComponentKind::Ic(ic) = component.kind() {
        if !ctx.ic_library.contains(&ic) {
            return Err(CircuitError::InvalidReplacement(format!(
                "IC definition {} is not registered",
                ic
            )));
        }
    }

    debug!("Place {} ({})", id, component.kind());
    let mut group = GroupAction::new("Place Component");
    group.apply(ctx, Action::place(component))?;
    Ok((group, id))
}

/// Delete components, disconnecting every attached wire and clearing their
/// selection first so undo restores all of it
pub fn create_delete_action(
    ctx: &mut DesignerContext,
    components: &[ComponentId],
) -> Result<GroupAction> {
    let targets: IndexSet<ComponentId> = components.iter().copied().collect();
    let mut wires: IndexSet<WireId> = IndexSet::new();
    for id in &targets {
        wires.extend(require(ctx, *id)?.attached_wires());
    }

    debug!("Delete {} components and {} wires", targets.len(), wires.len());
    let mut group = GroupAction::new("Delete Components");
    for id in &targets {
        if ctx.selections.contains(*id) {
            group.apply(ctx, Action::deselect(*id))?;
        }
    }
    apply_disconnects(ctx, &mut group, wires)?;
    for id in targets {
        group.apply(ctx, Action::delete(id))?;
    }
    Ok(group)
}

/// Connect an output port to an input port
pub fn create_connection_action(
    ctx: &mut DesignerContext,
    from: OutputPortRef,
    to: InputPortRef,
) -> Result<(GroupAction, WireId)> {
    ConnectionValidator::validate_connection(&ctx.circuit, &from, &to)?;
    let wire = ctx.circuit.allocate_wire_id();

    let mut group = GroupAction::new("Connect");
    group.apply(ctx, Action::connect(wire, from, to))?;
    Ok((group, wire))
}

pub fn create_disconnect_action(ctx: &mut DesignerContext, wire: WireId) -> Result<GroupAction> {
    ConnectionValidator::validate_disconnection(&ctx.circuit, wire)?;
    let mut group = GroupAction::new("Disconnect");
    apply_disconnects(ctx, &mut group, [wire])?;
    Ok(group)
}

/// Apply one `Disconnect` per wire, recording both endpoints for undo
pub(crate) fn apply_disconnects(
    ctx: &mut DesignerContext,
    group: &mut GroupAction,
    wires: impl IntoIterator<Item = WireId>,
) -> Result<()> {
    for id in wires {
        let wire = ctx
            .circuit
            .wire(id)
            .ok_or_else(|| CircuitError::NotInCircuit(format!("Wire {} not found", id)))?;
        let action = Action::disconnect(id, wire.from(), wire.to());
        group.apply(ctx, action)?;
    }
    Ok(())
}

/// Change the number of input ports, clamped to the component's bounds
pub fn create_input_port_change_action(
    ctx: &mut DesignerContext,
    component: ComponentId,
    count: usize,
) -> Result<GroupAction> {
    let target = require(ctx, component)?;
    let initial = target.input_count();
    let count = target.input_bounds().clamp(count);
    let doomed: Vec<WireId> = target.inputs()[count.min(initial)..]
        .iter()
        .filter_map(|port| port.wire())
        .collect();

    let mut group = GroupAction::new("Change Input Port Count");
    if count == initial {
        return Ok(group);
    }
    debug!("Input ports of {}: {} -> {}", component, initial, count);
    apply_disconnects(ctx, &mut group, doomed)?;
    group.apply(ctx, Action::input_port_change(component, initial, count))?;
    Ok(group)
}

/// Change the number of output ports, clamped to the component's bounds
pub fn create_output_port_change_action(
    ctx: &mut DesignerContext,
    component: ComponentId,
    count: usize,
) -> Result<GroupAction> {
    let target = require(ctx, component)?;
    let initial = target.output_count();
    let count = target.output_bounds().clamp(count);
    let doomed: Vec<WireId> = target.outputs()[count.min(initial)..]
        .iter()
        .flat_map(|port| port.wires().iter().copied())
        .collect();

    let mut group = GroupAction::new("Change Output Port Count");
    if count == initial {
        return Ok(group);
    }
    debug!("Output ports of {}: {} -> {}", component, initial, count);
    apply_disconnects(ctx, &mut group, doomed)?;
    group.apply(ctx, Action::output_port_change(component, initial, count))?;
    Ok(group)
}

/// Change the select-line count of a multiplexer or demultiplexer
pub fn create_select_port_change_action(
    ctx: &mut DesignerContext,
    component: ComponentId,
    count: usize,
) -> Result<GroupAction> {
    let target = require(ctx, component)?;
    let kind = target.kind();
    if !kind.is_mux_family() {
        return Err(CircuitError::PortRangeError(format!(
            "Component {} ({}) has no select lines",
            component, kind
        )));
    }

    let initial = target.select_count();
    let select = SELECT_BOUNDS.clamp(count);
    let inputs = kind.input_bounds(select).map_or(0, |bounds| bounds.min);
    let outputs = kind.output_bounds(select).map_or(0, |bounds| bounds.min);
    let doomed: Vec<WireId> = target
        .inputs()
        .iter()
        .skip(inputs)
        .filter_map(|port| port.wire())
        .chain(
            target
                .outputs()
                .iter()
                .skip(outputs)
                .flat_map(|port| port.wires().iter().copied()),
        )
        .collect();

    let mut group = GroupAction::new("Change Select Port Count");
    if select == initial {
        return Ok(group);
    }
    debug!("Select lines of {}: {} -> {}", component, initial, select);
    apply_disconnects(ctx, &mut group, doomed)?;
    group.apply(ctx, Action::select_port_change(component, initial, select))?;
    Ok(group)
}

/// Move components to new positions
pub fn create_translate_action(
    ctx: &mut DesignerContext,
    moves: &[(ComponentId, Position)],
) -> Result<GroupAction> {
    let mut planned = Vec::with_capacity(moves.len());
    for (id, target) in moves {
        planned.push(Action::translate(*id, require(ctx, *id)?.position(), *target));
    }

    let mut group = GroupAction::new("Translate");
    for action in planned {
        group.apply(ctx, action)?;
    }
    Ok(group)
}

pub fn create_deselect_all_action(ctx: &mut DesignerContext) -> Result<GroupAction> {
    let mut group = GroupAction::new("Deselect All");
    for id in ctx.selections.ids() {
        group.apply(ctx, Action::deselect(id))?;
    }
    Ok(group)
}

/// Select components, skipping ones already selected
pub fn create_group_select_action(
    ctx: &mut DesignerContext,
    components: &[ComponentId],
) -> Result<GroupAction> {
    for id in components {
        require(ctx, *id)?;
    }

    let mut group = GroupAction::new("Select");
    for id in components {
        if !ctx.selections.contains(*id) {
            group.apply(ctx, Action::select(*id))?;
        }
    }
    Ok(group)
}

/// Copy a standalone circuit into the live one under fresh IDs.
///
/// Returns the new component IDs in the source circuit's ID order.
pub fn create_add_group_action(
    ctx: &mut DesignerContext,
    source: &Circuit,
) -> Result<(GroupAction, Vec<ComponentId>)> {
    for component in source.components() {
        if let ComponentKind::Ic(ic) = component.kind() {
            if !ctx.ic_library.contains(&ic) {
                return Err(CircuitError::InvalidReplacement(format!(
                    "IC definition {} is not registered",
                    ic
                )));
            }
        }
    }

    let mut mapping: IndexMap<ComponentId, ComponentId> = IndexMap::new();
    let mut copies = Vec::with_capacity(source.component_count());
    for component in source.components() {
        let id = ctx.circuit.allocate_component_id();
        mapping.insert(component.id(), id);
        copies.push(component.duplicate(id));
    }

    let mut group = GroupAction::new("Add Group")
        .with_info(format!("Adding {} components", copies.len()));
    for copy in copies {
        group.apply(ctx, Action::place(copy))?;
    }
    for wire in source.wires() {
        let (Some(from), Some(to)) = (
            mapping.get(&wire.from().component_id()),
            mapping.get(&wire.to().component_id()),
        ) else {
            continue;
        };
        let id = ctx.circuit.allocate_wire_id();
        let action = Action::connect(
            id,
            from.output(wire.from().index()),
            to.input(wire.to().index()),
        );
        group.apply(ctx, action)?;
    }

    debug!("Added group of {} components", mapping.len());
    Ok((group, mapping.into_values().collect()))
}

/// Register an IC definition with the designer's library
pub fn create_register_ic_action(
    ctx: &mut DesignerContext,
    definition: IcDefinition,
) -> Result<(GroupAction, IcId)> {
    let id = definition.id();
    if ctx.ic_library.contains(&id) {
        return Err(CircuitError::ActionState(format!(
            "IC definition {} is already registered",
            id
        )));
    }

    let mut group = GroupAction::new("Create IC")
        .with_info(format!("Registering \"{}\"", definition.name()));
    group.apply(ctx, Action::register_ic(definition))?;
    Ok((group, id))
}

/// Remove a BUF or NOT gate, wiring its driver straight to its consumers.
///
/// If the gate's input is unwired its consumers are left undriven.
pub fn create_snip_gate_action(
    ctx: &mut DesignerContext,
    gate: ComponentId,
) -> Result<GroupAction> {
    let target = require(ctx, gate)?;
    if !matches!(target.kind(), ComponentKind::Buf | ComponentKind::Not) {
        return Err(CircuitError::InvalidReplacement(format!(
            "Only BUF and NOT gates can be snipped, {} is a {}",
            gate,
            target.kind()
        )));
    }

    let input_wire = target.inputs()[0].wire();
    let output_wires: Vec<WireId> = target.outputs()[0].wires().to_vec();
    let driver = input_wire
        .and_then(|wire| ctx.circuit.wire(wire))
        .map(|wire| wire.from());
    let consumers: Vec<InputPortRef> = output_wires
        .iter()
        .filter_map(|wire| ctx.circuit.wire(*wire))
        .map(|wire| wire.to())
        .collect();

    debug!("Snip {} ({} consumers)", gate, consumers.len());
    let mut group = GroupAction::new("Snip Gate");
    if ctx.selections.contains(gate) {
        group.apply(ctx, Action::deselect(gate))?;
    }
    apply_disconnects(ctx, &mut group, input_wire.into_iter().chain(output_wires))?;
    if let Some(driver) = driver {
        for consumer in consumers {
            let id = ctx.circuit.allocate_wire_id();
            group.apply(ctx, Action::connect(id, driver, consumer))?;
        }
    }
    group.apply(ctx, Action::delete(gate))?;
    Ok(group)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(
        ctx: &mut DesignerContext,
        gate: ComponentKind,
    ) -> (ComponentId, ComponentId, ComponentId) {
        let switch = ctx.circuit.add_component(ComponentKind::Switch).unwrap();
        let middle = ctx.circuit.add_component(gate).unwrap();
        let led = ctx.circuit.add_component(ComponentKind::Led).unwrap();
        ctx.circuit.connect(switch.output(0), middle.input(0)).unwrap();
        ctx.circuit.connect(middle.output(0), led.input(0)).unwrap();
        (switch, middle, led)
    }

    #[test]
    fn test_place_action_is_applied_on_creation() {
        let mut ctx = DesignerContext::new();
        let gate = ctx.circuit.create_component(ComponentKind::Nand).unwrap();
        let (mut action, id) = create_place_action(&mut ctx, gate).unwrap();
        assert!(ctx.circuit.contains_component(id));

        action.undo(&mut ctx).unwrap();
        assert!(!ctx.circuit.contains_component(id));
    }

    #[test]
    fn test_delete_restores_wiring_and_selection() {
        let mut ctx = DesignerContext::new();
        let (switch, not, led) = chain(&mut ctx, ComponentKind::Not);
        ctx.selections.select(not);
        ctx.selections.select(led);
        let before = ctx.circuit.snapshot();

        let mut action = create_delete_action(&mut ctx, &[not]).unwrap();
        assert_eq!(ctx.circuit.component_count(), 2);
        assert_eq!(ctx.circuit.wire_count(), 0);
        assert_eq!(ctx.selections.ids(), vec![led]);

        action.undo(&mut ctx).unwrap();
        assert_eq!(ctx.circuit.snapshot(), before);
        assert_eq!(ctx.selections.ids(), vec![not, led]);
        assert_eq!(ctx.circuit.input_value(led.input(0)), Some(true));
        assert!(ctx.circuit.contains_component(switch));
    }

    #[test]
    fn test_failed_delete_changes_nothing() {
        let mut ctx = DesignerContext::new();
        let (_, not, _) = chain(&mut ctx, ComponentKind::Not);
        let ghost = ComponentId::new(77);
        let err = create_delete_action(&mut ctx, &[not, ghost]).unwrap_err();
        assert!(matches!(err, CircuitError::NotInCircuit(_)));
        assert_eq!(ctx.circuit.component_count(), 3);
        assert_eq!(ctx.circuit.wire_count(), 2);
    }

    #[test]
    fn test_input_shrink_undo_reconnects() {
        let mut ctx = DesignerContext::new();
        let high = ctx.circuit.add_component(ComponentKind::ConstantHigh).unwrap();
        let gate = ctx.circuit.add_component(ComponentKind::Or).unwrap();
        let mut grow = create_input_port_change_action(&mut ctx, gate, 4).unwrap();
        assert_eq!(ctx.circuit.component(gate).unwrap().input_count(), 4);
        let (_, wire) = create_connection_action(&mut ctx, high.output(0), gate.input(3)).unwrap();
        assert_eq!(ctx.circuit.output_value(gate.output(0)), Some(true));

        let mut shrink = create_input_port_change_action(&mut ctx, gate, 2).unwrap();
        assert!(!ctx.circuit.contains_wire(wire));
        assert_eq!(ctx.circuit.output_value(gate.output(0)), Some(false));

        shrink.undo(&mut ctx).unwrap();
        assert!(ctx.circuit.contains_wire(wire));
        assert_eq!(ctx.circuit.output_value(gate.output(0)), Some(true));
        assert!(grow.undo(&mut ctx).is_err());
    }

    #[test]
    fn test_select_change_rejects_plain_gates() {
        let mut ctx = DesignerContext::new();
        let gate = ctx.circuit.add_component(ComponentKind::And).unwrap();
        let err = create_select_port_change_action(&mut ctx, gate, 2).unwrap_err();
        assert!(matches!(err, CircuitError::PortRangeError(_)));

        let mux = ctx.circuit.add_component(ComponentKind::Multiplexer).unwrap();
        let mut action = create_select_port_change_action(&mut ctx, mux, 3).unwrap();
        assert_eq!(ctx.circuit.component(mux).unwrap().input_count(), 11);
        action.undo(&mut ctx).unwrap();
        assert_eq!(ctx.circuit.component(mux).unwrap().input_count(), 3);
    }

    #[test]
    fn test_snip_reconnects_driver() {
        let mut ctx = DesignerContext::new();
        let (switch, buf, led) = chain(&mut ctx, ComponentKind::Buf);
        let extra = ctx.circuit.add_component(ComponentKind::Led).unwrap();
        ctx.circuit.connect(buf.output(0), extra.input(0)).unwrap();
        ctx.circuit.set_source(switch, true).unwrap();
        let before = ctx.circuit.snapshot();

        let mut action = create_snip_gate_action(&mut ctx, buf).unwrap();
        assert!(!ctx.circuit.contains_component(buf));
        assert_eq!(ctx.circuit.wire_count(), 2);
        assert_eq!(ctx.circuit.wire_into(led.input(0)).map(|w| w.from()), Some(switch.output(0)));
        assert_eq!(ctx.circuit.input_value(extra.input(0)), Some(true));

        action.undo(&mut ctx).unwrap();
        assert_eq!(ctx.circuit.snapshot(), before);
    }

    #[test]
    fn test_add_group_copies_wiring() {
        let mut source = Circuit::new();
        let a = source.add_component(ComponentKind::Switch).unwrap();
        let n = source.add_component(ComponentKind::Not).unwrap();
        source.connect(a.output(0), n.input(0)).unwrap();

        let mut ctx = DesignerContext::new();
        ctx.circuit.add_component(ComponentKind::Led).unwrap();
        let (mut action, ids) = create_add_group_action(&mut ctx, &source).unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(ctx.circuit.component_count(), 3);
        assert_eq!(ctx.circuit.wire_count(), 1);
        assert_eq!(ctx.circuit.component(ids[1]).unwrap().kind(), ComponentKind::Not);

        action.undo(&mut ctx).unwrap();
        assert_eq!(ctx.circuit.component_count(), 1);
    }

    #[test]
    fn test_translate_and_selection_round_trip() {
        let mut ctx = DesignerContext::new();
        let gate = ctx.circuit.add_component(ComponentKind::Xor).unwrap();
        let mut moved =
            create_translate_action(&mut ctx, &[(gate, Position::new(10.0, 20.0))]).unwrap();
        assert_eq!(ctx.circuit.component(gate).unwrap().position(), Position::new(10.0, 20.0));
        moved.undo(&mut ctx).unwrap();
        assert_eq!(ctx.circuit.component(gate).unwrap().position(), Position::default());

        let mut select = create_group_select_action(&mut ctx, &[gate]).unwrap();
        assert!(ctx.selections.contains(gate));
        let mut clear = create_deselect_all_action(&mut ctx).unwrap();
        assert!(ctx.selections.is_empty());
        clear.undo(&mut ctx).unwrap();
        select.undo(&mut ctx).unwrap();
        assert!(ctx.selections.is_empty());
    }
}
