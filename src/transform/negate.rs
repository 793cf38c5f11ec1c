use super::replace::create_replace_component_action;
use crate::actions::factories::create_snip_gate_action;
use crate::actions::{DesignerContext, GroupAction};
use crate::core::circuit::Circuit;
use crate::core::components::ComponentKind;
use crate::core::errors::{CircuitError, Result};
use crate::core::types::{ComponentId, WireId};
use indexmap::IndexSet;
use log::{debug, warn};

/// A set of components and wires taken from a live circuit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CircuitSubset {
    components: IndexSet<ComponentId>,
    wires: IndexSet<WireId>,
}

impl CircuitSubset {
    pub fn new(
        components: impl IntoIterator<Item = ComponentId>,
        wires: impl IntoIterator<Item = WireId>,
    ) -> Self {
        Self {
            components: components.into_iter().collect(),
            wires: wires.into_iter().collect(),
        }
    }

    /// The given components plus every wire running between two of them
    pub fn from_components(circuit: &Circuit, components: &[ComponentId]) -> Self {
        let members: IndexSet<ComponentId> = components.iter().copied().collect();
        let wires = circuit
            .wires()
            .filter(|wire| {
                members.contains(&wire.from().component_id())
                    && members.contains(&wire.to().component_id())
            })
            .map(|wire| wire.id())
            .collect();
        Self {
            components: members,
            wires,
        }
    }

    /// Every component and wire of a circuit
    pub fn whole(circuit: &Circuit) -> Self {
        Self::new(circuit.component_ids(), circuit.wire_ids())
    }

    pub fn components(&self) -> impl Iterator<Item = &ComponentId> {
        self.components.iter()
    }

    pub fn wires(&self) -> impl Iterator<Item = &WireId> {
        self.wires.iter()
    }

    pub fn contains_component(&self, id: ComponentId) -> bool {
        self.components.contains(&id)
    }

    pub fn contains_wire(&self, id: WireId) -> bool {
        self.wires.contains(&id)
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    fn replace_component(&mut self, old: ComponentId, new: ComponentId) {
        if let Some(index) = self.components.get_index_of(&old) {
            self.components.shift_remove(&old);
            self.components.shift_insert(index, new);
        }
    }
}

/// Fuse every AND/OR/XOR gate whose only consumer is a NOT gate into the
/// matching NAND/NOR/XNOR.
///
/// Candidates are taken from a snapshot of `subset`; both gates of a match must
/// belong to it. After each fusion the working subset drops the NOT gate and
/// the wires that went away and takes in the new gate and its wires, so later
/// matches never see deleted elements. Returns the rewritten subset together
/// with one group holding every fusion, already applied.
pub fn create_negated_gates_action(
    ctx: &mut DesignerContext,
    subset: &CircuitSubset,
) -> Result<(GroupAction, CircuitSubset)> {
    for id in subset.components() {
        if !ctx.circuit.contains_component(*id) {
            return Err(CircuitError::NotInCircuit(format!("Component {} not found", id)));
        }
    }

    let mut group = GroupAction::new("Create Negated Gates");
    let mut working = subset.clone();
    let candidates: Vec<ComponentId> = subset
        .components()
        .copied()
        .filter(|id| {
            ctx.circuit
                .component(*id)
                .is_some_and(|component| component.kind().is_fusable_gate())
        })
        .collect();

    for gate in candidates {
        if let Err(e) = fuse(ctx, &mut working, &mut group, gate) {
            if let Err(rollback) = group.undo(ctx) {
                warn!("Could not roll back negated gate fusion: {}", rollback);
            }
            return Err(e);
        }
    }

    debug!("Fused {} negated gates", group.len());
    Ok((group, working))
}

/// Fuse one gate if it matches, recording the rewrite into `group`
fn fuse(
    ctx: &mut DesignerContext,
    working: &mut CircuitSubset,
    group: &mut GroupAction,
    gate: ComponentId,
) -> Result<()> {
    if !working.contains_component(gate) {
        return Ok(());
    }
    let Some(component) = ctx.circuit.component(gate) else {
        return Ok(());
    };
    let Some(negated) = component.kind().negated() else {
        return Ok(());
    };
    let [link] = component.outputs()[0].wires() else {
        return Ok(());
    };
    let Some(wire) = ctx.circuit.wire(*link) else {
        return Ok(());
    };
    let not = wire.to().component_id();
    let Some(not_gate) = ctx.circuit.component(not) else {
        return Ok(());
    };
    if not == gate || not_gate.kind() != ComponentKind::Not || !working.contains_component(not) {
        return Ok(());
    }

    for stale in component.attached_wires().into_iter().chain(not_gate.attached_wires()) {
        working.wires.shift_remove(&stale);
    }
    working.components.shift_remove(&not);

    debug!("Fusing {} with {} into {}", gate, not, negated);
    let snip = create_snip_gate_action(ctx, not)?;
    group.append(snip)?;
    let (replace, replacement) = create_replace_component_action(ctx, gate, negated, false)?;
    group.append(replace)?;

    working.replace_component(gate, replacement);
    if let Some(component) = ctx.circuit.component(replacement) {
        working.wires.extend(component.attached_wires());
    }
    Ok(())
}
