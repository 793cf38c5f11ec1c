use super::context::DesignerContext;
use super::group::GroupAction;
use crate::core::components::{Component, IcDefinition};
use crate::core::errors::{CircuitError, Result};
use crate::core::types::{ComponentId, IcId, InputPortRef, OutputPortRef, Position, WireId};
use log::trace;

/// A single reversible change to a designer context.
///
/// `execute` may be called once before a matching `undo`; `undo` restores the
/// state `execute` started from; executing again after an undo (redo) lands
/// on the same state as the first execution. Calling them out of turn fails
/// with [`CircuitError::ActionState`] and changes nothing.
#[derive(Debug, Clone)]
pub enum Action {
    /// Add a built component; the component is held here while not placed
    Place {
        component: ComponentId,
        stash: Option<Box<Component>>,
    },
    /// Remove an unwired component; the component is held here while deleted
    Delete {
        component: ComponentId,
        stash: Option<Box<Component>>,
    },
    /// Attach a wire; `slot` is its place in the source's fan-out once known
    Connect {
        wire: WireId,
        from: OutputPortRef,
        to: InputPortRef,
        slot: Option<usize>,
        applied: bool,
    },
    /// Detach a wire; `slot` remembers where it sat so undo can put it back
    Disconnect {
        wire: WireId,
        from: OutputPortRef,
        to: InputPortRef,
        slot: Option<usize>,
        applied: bool,
    },
    InputPortChange {
        component: ComponentId,
        initial: usize,
        target: usize,
        applied: bool,
    },
    OutputPortChange {
        component: ComponentId,
        initial: usize,
        target: usize,
        applied: bool,
    },
    /// Change the select-line count of a multiplexer or demultiplexer
    SelectPortChange {
        component: ComponentId,
        initial: usize,
        target: usize,
        applied: bool,
    },
    Translate {
        component: ComponentId,
        initial: Position,
        target: Position,
        applied: bool,
    },
    Select {
        component: ComponentId,
        applied: bool,
        changed: bool,
    },
    Deselect {
        component: ComponentId,
        applied: bool,
        index: Option<usize>,
    },
    /// Add a definition to the IC library; held here while not registered
    RegisterIc {
        id: IcId,
        stash: Option<Box<IcDefinition>>,
    },
    Group(GroupAction),
}

fn already_executed(what: &str) -> CircuitError {
    CircuitError::ActionState(format!("{} was already executed", what))
}

fn not_executed(what: &str) -> CircuitError {
    CircuitError::ActionState(format!("{} has not been executed", what))
}

impl Action {
    pub fn place(component: Component) -> Self {
        Action::Place {
            component: component.id(),
            stash: Some(Box::new(component)),
        }
    }

    pub fn delete(component: ComponentId) -> Self {
        Action::Delete {
            component,
            stash: None,
        }
    }

    pub fn connect(wire: WireId, from: OutputPortRef, to: InputPortRef) -> Self {
        Action::Connect {
            wire,
            from,
            to,
            slot: None,
            applied: false,
        }
    }

    pub fn disconnect(wire: WireId, from: OutputPortRef, to: InputPortRef) -> Self {
        Action::Disconnect {
            wire,
            from,
            to,
            slot: None,
            applied: false,
        }
    }

    pub fn input_port_change(component: ComponentId, initial: usize, target: usize) -> Self {
        Action::InputPortChange {
            component,
            initial,
            target,
            applied: false,
        }
    }

    pub fn output_port_change(component: ComponentId, initial: usize, target: usize) -> Self {
        Action::OutputPortChange {
            component,
            initial,
            target,
            applied: false,
        }
    }

    pub fn select_port_change(component: ComponentId, initial: usize, target: usize) -> Self {
        Action::SelectPortChange {
            component,
            initial,
            target,
            applied: false,
        }
    }

    pub fn translate(component: ComponentId, initial: Position, target: Position) -> Self {
        Action::Translate {
            component,
            initial,
            target,
            applied: false,
        }
    }

    pub fn select(component: ComponentId) -> Self {
        Action::Select {
            component,
            applied: false,
            changed: false,
        }
    }

    pub fn deselect(component: ComponentId) -> Self {
        Action::Deselect {
            component,
            applied: false,
            index: None,
        }
    }

    pub fn register_ic(definition: IcDefinition) -> Self {
        Action::RegisterIc {
            id: definition.id(),
            stash: Some(Box::new(definition)),
        }
    }

    /// Short name for logs and history panels
    pub fn name(&self) -> &str {
        match self {
            Action::Place { .. } => "Place",
            Action::Delete { .. } => "Delete",
            Action::Connect { .. } => "Connect",
            Action::Disconnect { .. } => "Disconnect",
            Action::InputPortChange { .. } => "Input Port Change",
            Action::OutputPortChange { .. } => "Output Port Change",
            Action::SelectPortChange { .. } => "Select Port Change",
            Action::Translate { .. } => "Translate",
            Action::Select { .. } => "Select",
            Action::Deselect { .. } => "Deselect",
            Action::RegisterIc { .. } => "Register IC",
            Action::Group(group) => group.name(),
        }
    }

    pub fn execute(&mut self, ctx: &mut DesignerContext) -> Result<()> {
        trace!("Executing {}", self.name());
        match self {
            Action::Place { component, stash } => {
                let Some(placed) = stash.take() else {
                    return Err(already_executed("Place"));
                };
                if ctx.circuit.contains_component(*component) {
                    *stash = Some(placed);
                    return Err(CircuitError::ActionState(format!(
                        "Component {} is already placed",
                        component
                    )));
                }
                ctx.circuit.insert_component(*placed)?;
            }
            Action::Delete { component, stash } => {
                if stash.is_some() {
                    return Err(already_executed("Delete"));
                }
                let target = ctx.circuit.component(*component).ok_or_else(|| {
                    CircuitError::NotInCircuit(format!("Component {} not found", component))
                })?;
                if target.is_wired() {
                    return Err(CircuitError::ActionState(format!(
                        "Component {} must be disconnected before it is deleted",
                        component
                    )));
                }
                let (removed, _) = ctx.circuit.remove_component(*component)?;
                *stash = Some(Box::new(removed));
            }
            Action::Connect {
                wire,
                from,
                to,
                slot,
                applied,
            } => {
                if *applied {
                    return Err(already_executed("Connect"));
                }
                ctx.circuit.connect_at(*wire, *from, *to, *slot)?;
                *applied = true;
            }
            Action::Disconnect {
                wire,
                slot,
                applied,
                ..
            } => {
                if *applied {
                    return Err(already_executed("Disconnect"));
                }
                let (_, index) = ctx.circuit.detach(*wire)?;
                *slot = Some(index);
                *applied = true;
            }
            Action::InputPortChange {
                component,
                target,
                applied,
                ..
            } => {
                if *applied {
                    return Err(already_executed("Input Port Change"));
                }
                ensure_inputs_free(ctx, *component, *target)?;
                ctx.circuit.set_input_port_count(*component, *target)?;
                *applied = true;
            }
            Action::OutputPortChange {
                component,
                target,
                applied,
                ..
            } => {
                if *applied {
                    return Err(already_executed("Output Port Change"));
                }
                ensure_outputs_free(ctx, *component, *target)?;
                ctx.circuit.set_output_port_count(*component, *target)?;
                *applied = true;
            }
            Action::SelectPortChange {
                component,
                target,
                applied,
                ..
            } => {
                if *applied {
                    return Err(already_executed("Select Port Change"));
                }
                ensure_select_free(ctx, *component, *target)?;
                ctx.circuit.set_select_count(*component, *target)?;
                *applied = true;
            }
            Action::Translate {
                component,
                target,
                applied,
                ..
            } => {
                if *applied {
                    return Err(already_executed("Translate"));
                }
                ctx.circuit.set_position(*component, *target)?;
                *applied = true;
            }
            Action::Select {
                component,
                applied,
                changed,
            } => {
                if *applied {
                    return Err(already_executed("Select"));
                }
                *changed = ctx.selections.select(*component);
                *applied = true;
            }
            Action::Deselect {
                component,
                applied,
                index,
            } => {
                if *applied {
                    return Err(already_executed("Deselect"));
                }
                *index = ctx.selections.deselect(*component);
                *applied = true;
            }
            Action::RegisterIc { stash, .. } => {
                let Some(definition) = stash.take() else {
                    return Err(already_executed("Register IC"));
                };
                ctx.ic_library.insert(*definition);
            }
            Action::Group(group) => group.execute(ctx)?,
        }
        Ok(())
    }

    pub fn undo(&mut self, ctx: &mut DesignerContext) -> Result<()> {
        trace!("Undoing {}", self.name());
        match self {
            Action::Place { component, stash } => {
                if stash.is_some() {
                    return Err(not_executed("Place"));
                }
                let placed = ctx.circuit.component(*component).ok_or_else(|| {
                    CircuitError::NotInCircuit(format!("Component {} not found", component))
                })?;
                if placed.is_wired() {
                    return Err(CircuitError::ActionState(format!(
                        "Component {} must be disconnected before its placement is undone",
                        component
                    )));
                }
                let (removed, _) = ctx.circuit.remove_component(*component)?;
                *stash = Some(Box::new(removed));
            }
            Action::Delete { stash, .. } => {
                let Some(removed) = stash.take() else {
                    return Err(not_executed("Delete"));
                };
                ctx.circuit.insert_component(*removed)?;
            }
            Action::Connect {
                wire,
                slot,
                applied,
                ..
            } => {
                if !*applied {
                    return Err(not_executed("Connect"));
                }
                let (_, index) = ctx.circuit.detach(*wire)?;
                *slot = Some(index);
                *applied = false;
            }
            Action::Disconnect {
                wire,
                from,
                to,
                slot,
                applied,
            } => {
                if !*applied {
                    return Err(not_executed("Disconnect"));
                }
                ctx.circuit.connect_at(*wire, *from, *to, *slot)?;
                *applied = false;
            }
            Action::InputPortChange {
                component,
                initial,
                applied,
                ..
            } => {
                if !*applied {
                    return Err(not_executed("Input Port Change"));
                }
                ensure_inputs_free(ctx, *component, *initial)?;
                ctx.circuit.set_input_port_count(*component, *initial)?;
                *applied = false;
            }
            Action::OutputPortChange {
                component,
                initial,
                applied,
                ..
            } => {
                if !*applied {
                    return Err(not_executed("Output Port Change"));
                }
                ensure_outputs_free(ctx, *component, *initial)?;
                ctx.circuit.set_output_port_count(*component, *initial)?;
                *applied = false;
            }
            Action::SelectPortChange {
                component,
                initial,
                applied,
                ..
            } => {
                if !*applied {
                    return Err(not_executed("Select Port Change"));
                }
                ensure_select_free(ctx, *component, *initial)?;
                ctx.circuit.set_select_count(*component, *initial)?;
                *applied = false;
            }
            Action::Translate {
                component,
                initial,
                applied,
                ..
            } => {
                if !*applied {
                    return Err(not_executed("Translate"));
                }
                ctx.circuit.set_position(*component, *initial)?;
                *applied = false;
            }
            Action::Select {
                component,
                applied,
                changed,
            } => {
                if !*applied {
                    return Err(not_executed("Select"));
                }
                if *changed {
                    ctx.selections.deselect(*component);
                }
                *applied = false;
            }
            Action::Deselect {
                component,
                applied,
                index,
            } => {
                if !*applied {
                    return Err(not_executed("Deselect"));
                }
                if let Some(index) = index.take() {
                    ctx.selections.restore(*component, index);
                }
                *applied = false;
            }
            Action::RegisterIc { id, stash } => {
                if stash.is_some() {
                    return Err(not_executed("Register IC"));
                }
                let definition = ctx.ic_library.remove(id).ok_or_else(|| {
                    CircuitError::NotInCircuit(format!("IC definition {} is not registered", id))
                })?;
                *stash = Some(Box::new(definition));
            }
            Action::Group(group) => group.undo(ctx)?,
        }
        Ok(())
    }
}

// Port-count actions never drop wires themselves; factories disconnect first
fn ensure_inputs_free(ctx: &DesignerContext, component: ComponentId, count: usize) -> Result<()> {
    let target = require(ctx, component)?;
    let count = target.input_bounds().clamp(count);
    if target.inputs_in_use() > count {
        return Err(CircuitError::ActionState(format!(
            "Input ports of component {} beyond {} are still wired",
            component, count
        )));
    }
    Ok(())
}

fn ensure_outputs_free(ctx: &DesignerContext, component: ComponentId, count: usize) -> Result<()> {
    let target = require(ctx, component)?;
    let count = target.output_bounds().clamp(count);
    if target.outputs_in_use() > count {
        return Err(CircuitError::ActionState(format!(
            "Output ports of component {} beyond {} are still wired",
            component, count
        )));
    }
    Ok(())
}

fn ensure_select_free(ctx: &DesignerContext, component: ComponentId, select: usize) -> Result<()> {
    let target = require(ctx, component)?;
    let kind = target.kind();
    let (Some(inputs), Some(outputs)) = (kind.input_bounds(select), kind.output_bounds(select))
    else {
        return Err(CircuitError::PortRangeError(format!(
            "Component {} ({}) has no select lines",
            component, kind
        )));
    };
    if target.inputs_in_use() > inputs.min || target.outputs_in_use() > outputs.min {
        return Err(CircuitError::ActionState(format!(
            "Ports of component {} removed by {} select lines are still wired",
            component, select
        )));
    }
    Ok(())
}

fn require(ctx: &DesignerContext, component: ComponentId) -> Result<&Component> {
    ctx.circuit
        .component(component)
        .ok_or_else(|| CircuitError::NotInCircuit(format!("Component {} not found", component)))
}
