use crate::actions::{Action, DesignerContext, GroupAction};
use crate::core::components::{Component, ComponentKind, IcLibrary, SELECT_BOUNDS};
use crate::core::errors::{CircuitError, Result};
use crate::core::types::{ComponentId, IcId, InputPortRef, OutputPortRef, WireId};
use log::debug;
use std::str::FromStr;

/// What a component is replaced with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replacement {
    Kind(ComponentKind),
    Ic(IcId),
}

impl Replacement {
    /// Resolve a component identifier, falling back to IC definition names
    pub fn resolve(id: &str, library: &IcLibrary) -> Result<Self> {
        if let Ok(kind) = ComponentKind::from_str(id) {
            return Ok(Replacement::Kind(kind));
        }
        library
            .iter()
            .find(|definition| definition.name() == id)
            .map(|definition| Replacement::Ic(definition.id()))
            .ok_or_else(|| invalid_id(id))
    }
}

impl From<ComponentKind> for Replacement {
    fn from(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::Ic(id) => Replacement::Ic(id),
            kind => Replacement::Kind(kind),
        }
    }
}

impl From<IcId> for Replacement {
    fn from(id: IcId) -> Self {
        Replacement::Ic(id)
    }
}

/// Port layout the replacement needs to take over the original's wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PortPlan {
    Select(usize),
    Counts { inputs: usize, outputs: usize },
    Fixed,
}

fn invalid_id(id: impl std::fmt::Display) -> CircuitError {
    CircuitError::InvalidReplacement(format!("Supplied replacement id \"{}\" is invalid", id))
}

/// Smallest `s` with `2^s >= n`
fn ceil_log2(n: usize) -> usize {
    if n <= 1 {
        0
    } else {
        (usize::BITS - (n - 1).leading_zeros()) as usize
    }
}

fn plan_ports(original: &Component, kind: ComponentKind, library: &IcLibrary) -> Result<PortPlan> {
    let inputs_in_use = original.inputs_in_use();
    let outputs_in_use = original.outputs_in_use();
    let too_small = || {
        CircuitError::PortRangeError(format!(
            "{} cannot take over {} wired inputs and {} wired outputs of {}",
            kind,
            inputs_in_use,
            outputs_in_use,
            original.id()
        ))
    };

    if let ComponentKind::Ic(ic) = kind {
        let definition = library.get(&ic).ok_or_else(|| invalid_id(ic))?;
        if definition.input_count() < inputs_in_use || definition.output_count() < outputs_in_use {
            return Err(too_small());
        }
        return Ok(PortPlan::Fixed);
    }

    if kind.is_mux_family() {
        let previous = if original.kind().is_mux_family() {
            original.select_count()
        } else {
            kind.default_select_count()
        };
        let wired = if kind == ComponentKind::Multiplexer {
            inputs_in_use
        } else {
            outputs_in_use
        };
        let covers = |select: usize| {
            let inputs = kind.input_bounds(select).map_or(0, |bounds| bounds.max);
            let outputs = kind.output_bounds(select).map_or(0, |bounds| bounds.max);
            inputs >= inputs_in_use && outputs >= outputs_in_use
        };

        let mut select = SELECT_BOUNDS.clamp(previous.max(ceil_log2(wired)));
        while !covers(select) && select < SELECT_BOUNDS.max {
            select += 1;
        }
        if !covers(select) {
            return Err(too_small());
        }
        return Ok(PortPlan::Select(select));
    }

    let (default_inputs, default_outputs) = kind
        .default_port_counts()
        .ok_or_else(|| {
            CircuitError::InvalidReplacement(format!("{} cannot be created by name", kind))
        })?;
    let input_bounds = kind.input_bounds(0).ok_or_else(too_small)?;
    let output_bounds = kind.output_bounds(0).ok_or_else(too_small)?;
    let inputs = default_inputs.max(inputs_in_use);
    let outputs = default_outputs.max(outputs_in_use);
    if inputs > input_bounds.max || outputs > output_bounds.max {
        return Err(too_small());
    }
    Ok(PortPlan::Counts { inputs, outputs })
}

/// One wire to move from the original onto the replacement
enum Rewire {
    /// Original input `index` driven by `far`
    Input { wire: WireId, index: usize, far: OutputPortRef },
    /// Original output `index` driving `far`
    Output { wire: WireId, index: usize, far: InputPortRef },
    /// Original output feeding one of its own inputs
    Loop { wire: WireId, output: usize, input: usize },
}

/// Replace a placed component with another kind or an IC, keeping its wiring.
///
/// The replacement lands at the original's position and angle with enough
/// ports to take over every wired port of the original; each wire is
/// disconnected and reconnected at the same port index on the replacement,
/// then the original is deleted. With `update_selection` the current
/// selection is cleared and the replacement selected.
///
/// Building the action performs it. Fails without changing anything when the
/// original is not in the circuit, the replacement does not resolve, or it
/// cannot offer enough ports.
pub fn create_replace_component_action(
    ctx: &mut DesignerContext,
    original: ComponentId,
    replacement: impl Into<Replacement>,
    update_selection: bool,
) -> Result<(GroupAction, ComponentId)> {
    let replacement = replacement.into();
    let source = ctx.circuit.component(original).ok_or_else(|| {
        CircuitError::NotInCircuit(format!(
            "Original component {} is not in the circuit",
            original
        ))
    })?;

    let (kind, label) = match replacement {
        Replacement::Kind(kind) => (kind, kind.identifier().to_string()),
        Replacement::Ic(ic) => {
            let definition = ctx.ic_library.get(&ic).ok_or_else(|| invalid_id(ic))?;
            (ComponentKind::Ic(ic), definition.name().to_string())
        }
    };
    let plan = plan_ports(source, kind, &ctx.ic_library)?;

    let mut rewires = Vec::new();
    for (index, port) in source.inputs().iter().enumerate() {
        let Some(wire) = port.wire().and_then(|id| ctx.circuit.wire(id)) else {
            continue;
        };
        if wire.from().component_id() != original {
            rewires.push(Rewire::Input {
                wire: wire.id(),
                index,
                far: wire.from(),
            });
        }
    }
    for (index, port) in source.outputs().iter().enumerate() {
        for wire in port.wires().iter().filter_map(|id| ctx.circuit.wire(*id)) {
            rewires.push(if wire.to().component_id() == original {
                Rewire::Loop {
                    wire: wire.id(),
                    output: index,
                    input: wire.to().index(),
                }
            } else {
                Rewire::Output {
                    wire: wire.id(),
                    index,
                    far: wire.to(),
                }
            });
        }
    }

    let original_label = source
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| source.kind().identifier().to_string());
    let position = source.position();
    let angle = source.angle();
    let was_selected = ctx.selections.contains(original);

    let mut built = match kind {
        ComponentKind::Ic(ic) => {
            let definition = ctx.ic_library.get(&ic).ok_or_else(|| invalid_id(ic))?;
            ctx.circuit.create_ic_component(definition)
        }
        kind => ctx.circuit.create_component(kind)?,
    }
    .with_position(position);
    built.angle = angle;
    let id = built.id();
    let initial_inputs = built.input_count();
    let initial_outputs = built.output_count();
    let initial_select = built.select_count();

    debug!("Replacing {} ({}) with {} as {}", original, original_label, label, id);
    let mut group = GroupAction::new("Replace Component")
        .with_info(format!("Replacing \"{}\" with a(n) \"{}\"", original_label, label));

    if update_selection {
        for selected in ctx.selections.ids() {
            group.apply(ctx, Action::deselect(selected))?;
        }
    }
    group.apply(ctx, Action::place(built))?;
    if update_selection {
        group.apply(ctx, Action::select(id))?;
    } else if was_selected {
        group.apply(ctx, Action::deselect(original))?;
    }

    match plan {
        PortPlan::Select(select) if select != initial_select => {
            group.apply(ctx, Action::select_port_change(id, initial_select, select))?;
        }
        PortPlan::Counts { inputs, outputs } => {
            if inputs != initial_inputs {
                group.apply(ctx, Action::input_port_change(id, initial_inputs, inputs))?;
            }
            if outputs != initial_outputs {
                group.apply(ctx, Action::output_port_change(id, initial_outputs, outputs))?;
            }
        }
        _ => {}
    }

    for rewire in rewires {
        let (old, from, to) = match rewire {
            Rewire::Input { wire, index, far } => (wire, far, id.input(index)),
            Rewire::Output { wire, index, far } => (wire, id.output(index), far),
            Rewire::Loop { wire, output, input } => (wire, id.output(output), id.input(input)),
        };
        let previous = ctx
            .circuit
            .wire(old)
            .ok_or_else(|| CircuitError::NotInCircuit(format!("Wire {} not found", old)))?;
        let disconnect = Action::disconnect(old, previous.from(), previous.to());
        group.apply(ctx, disconnect)?;
        let fresh = ctx.circuit.allocate_wire_id();
        group.apply(ctx, Action::connect(fresh, from, to))?;
    }

    group.apply(ctx, Action::delete(original))?;
    Ok((group, id))
}
