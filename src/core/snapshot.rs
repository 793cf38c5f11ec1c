use super::circuit::Circuit;
use super::components::{Component, ComponentKind, IcLibrary, SELECT_BOUNDS};
use super::errors::{CircuitError, Result};
use super::execution::PropagationConfig;
use super::types::{ComponentId, InputPortRef, OutputPortRef, Position, WireId};
use log::debug;
use serde::{Deserialize, Serialize};

/// Serializable record of one component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub id: ComponentId,
    pub kind: ComponentKind,
    pub name: Option<String>,
    pub position: Position,
    pub angle: f32,
    pub input_count: usize,
    pub output_count: usize,
    pub select_count: usize,
    /// Output values of switches and buttons; empty for everything else
    pub source_state: Vec<bool>,
}

/// Serializable record of one wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireRecord {
    pub id: WireId,
    pub from: OutputPortRef,
    pub to: InputPortRef,
}

/// Plain-data copy of a circuit's structure.
///
/// Port values other than switch and button states are not stored; they are
/// recomputed by propagation when the snapshot is loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CircuitSnapshot {
    pub components: Vec<ComponentRecord>,
    pub wires: Vec<WireRecord>,
}

impl CircuitSnapshot {
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl Circuit {
    /// Capture the circuit's components and wires in ID order
    pub fn snapshot(&self) -> CircuitSnapshot {
        let components = self
            .components()
            .map(|component| ComponentRecord {
                id: component.id(),
                kind: component.kind(),
                name: component.name().map(str::to_string),
                position: component.position(),
                angle: component.angle(),
                input_count: component.input_count(),
                output_count: component.output_count(),
                select_count: component.select_count(),
                source_state: if component.kind().is_interactive_input() {
                    component.outputs().iter().map(|port| port.value()).collect()
                } else {
                    Vec::new()
                },
            })
            .collect();

        let wires = self
            .wires()
            .map(|wire| WireRecord {
                id: wire.id(),
                from: wire.from(),
                to: wire.to(),
            })
            .collect();

        CircuitSnapshot { components, wires }
    }

    /// Rebuild a circuit from a snapshot, resolving IC kinds through `library`
    pub fn from_snapshot(snapshot: &CircuitSnapshot, library: &IcLibrary) -> Result<Circuit> {
        Self::from_snapshot_with_config(snapshot, library, PropagationConfig::default())
    }

    pub fn from_snapshot_with_config(
        snapshot: &CircuitSnapshot,
        library: &IcLibrary,
        config: PropagationConfig,
    ) -> Result<Circuit> {
        let mut circuit = Circuit::with_config(config);

        for record in &snapshot.components {
            let component = restore_component(record, library)?;
            circuit.insert_component(component)?;
        }
        for record in &snapshot.wires {
            circuit.connect_with_id(record.id, record.from, record.to)?;
        }

        debug!(
            "Loaded snapshot with {} components and {} wires",
            circuit.component_count(),
            circuit.wire_count()
        );
        Ok(circuit)
    }
}

fn restore_component(record: &ComponentRecord, library: &IcLibrary) -> Result<Component> {
    let mut component = match record.kind {
        ComponentKind::Ic(ic) => {
            let definition = library.get(&ic).ok_or_else(|| {
                CircuitError::InvalidReplacement(format!("IC definition {} is not registered", ic))
            })?;
            Component::from_ic(record.id, definition)
        }
        kind => Component::new(record.id, kind)?,
    };

    if component.kind().is_mux_family() {
        if !SELECT_BOUNDS.contains(record.select_count) {
            return Err(CircuitError::PortRangeError(format!(
                "Component {} ({}) cannot have {} select lines",
                record.id, record.kind, record.select_count
            )));
        }
        component.select_count = record.select_count;
    }
    let inputs = component.input_bounds();
    let outputs = component.output_bounds();
    if !inputs.contains(record.input_count) || !outputs.contains(record.output_count) {
        return Err(CircuitError::PortRangeError(format!(
            "Component {} ({}) cannot have {} inputs and {} outputs",
            record.id, record.kind, record.input_count, record.output_count
        )));
    }
    component.resize_inputs(record.input_count);
    component.resize_outputs(record.output_count);

    component.name = record.name.clone();
    component.position = record.position;
    component.angle = record.angle;
    for (port, value) in component.outputs.iter_mut().zip(&record.source_state) {
        port.value = *value;
    }
    Ok(component)
}
