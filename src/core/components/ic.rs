use super::types::ComponentKind;
use crate::core::circuit::Circuit;
use crate::core::errors::{CircuitError, Result};
use crate::core::types::{ComponentId, IcId};
use indexmap::IndexMap;
use log::{debug, warn};

/// A captured circuit that can be placed as a single component.
///
/// Boundary inputs are the circuit's switches and buttons, boundary outputs
/// its LEDs, both ordered top to bottom (then left to right, then by ID).
#[derive(Debug, Clone)]
pub struct IcDefinition {
    id: IcId,
    name: String,
    circuit: Circuit,
    inputs: Vec<ComponentId>,
    outputs: Vec<ComponentId>,
}

impl IcDefinition {
    /// Capture `circuit` as a reusable IC
    pub fn from_circuit(name: impl Into<String>, circuit: Circuit) -> Result<Self> {
        let name = name.into();
        let inputs = boundary(&circuit, |kind| kind.is_interactive_input());
        let outputs = boundary(&circuit, |kind| kind.is_sink());

        if inputs.is_empty() && outputs.is_empty() {
            return Err(CircuitError::PortRangeError(format!(
                "IC '{}' has no boundary inputs or outputs",
                name
            )));
        }

        debug!(
            "Captured IC '{}' with {} inputs and {} outputs",
            name,
            inputs.len(),
            outputs.len()
        );

        Ok(Self {
            id: IcId::generate(),
            name,
            circuit,
            inputs,
            outputs,
        })
    }

    pub fn id(&self) -> IcId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }
}

fn boundary(circuit: &Circuit, select: impl Fn(&ComponentKind) -> bool) -> Vec<ComponentId> {
    let mut ports: Vec<_> = circuit
        .components()
        .filter(|component| select(&component.kind()))
        .map(|component| (component.position(), component.id()))
        .collect();
    ports.sort_by(|(a, a_id), (b, b_id)| {
        a.y.total_cmp(&b.y)
            .then(a.x.total_cmp(&b.x))
            .then(a_id.cmp(b_id))
    });
    ports.into_iter().map(|(_, id)| id).collect()
}

/// Live copy of an IC definition's circuit owned by one placed IC
#[derive(Debug, Clone)]
pub struct IcInstance {
    definition: IcId,
    circuit: Circuit,
    inputs: Vec<ComponentId>,
    outputs: Vec<ComponentId>,
}

impl IcInstance {
    pub(crate) fn new(definition: &IcDefinition) -> Self {
        Self {
            definition: definition.id,
            circuit: definition.circuit.clone(),
            inputs: definition.inputs.clone(),
            outputs: definition.outputs.clone(),
        }
    }

    pub fn definition(&self) -> IcId {
        self.definition
    }

    /// Drive the boundary inputs and read the boundary LEDs
    pub(crate) fn evaluate(&mut self, inputs: &[bool]) -> Vec<bool> {
        for (component, value) in self.inputs.iter().zip(inputs) {
            if let Err(e) = self.circuit.activate(*component, 0, *value) {
                warn!("IC {} could not drive inner input {}: {}", self.definition, component, e);
            }
        }

        self.outputs
            .iter()
            .map(|led| {
                self.circuit
                    .component(*led)
                    .and_then(|component| component.input_value(0))
                    .unwrap_or(false)
            })
            .collect()
    }
}

/// Registry of IC definitions available to a designer
#[derive(Debug, Clone, Default)]
pub struct IcLibrary {
    definitions: IndexMap<IcId, IcDefinition>,
}

impl IcLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition, returning its ID
    pub fn insert(&mut self, definition: IcDefinition) -> IcId {
        let id = definition.id();
        self.definitions.insert(id, definition);
        id
    }

    pub fn remove(&mut self, id: &IcId) -> Option<IcDefinition> {
        self.definitions.shift_remove(id)
    }

    pub fn get(&self, id: &IcId) -> Option<&IcDefinition> {
        self.definitions.get(id)
    }

    pub fn contains(&self, id: &IcId) -> bool {
        self.definitions.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IcDefinition> {
        self.definitions.values()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Position;

    fn half_adder() -> Circuit {
        let mut circuit = Circuit::new();
        let a = circuit.add_component(ComponentKind::Switch).unwrap();
        let b = circuit.add_component(ComponentKind::Switch).unwrap();
        circuit.set_position(b, Position::new(0.0, 100.0)).unwrap();
        let xor = circuit.add_component(ComponentKind::Xor).unwrap();
        let and = circuit.add_component(ComponentKind::And).unwrap();
        let sum = circuit.add_component(ComponentKind::Led).unwrap();
        let carry = circuit.add_component(ComponentKind::Led).unwrap();
        circuit.set_position(carry, Position::new(200.0, 100.0)).unwrap();

        circuit.connect(a.output(0), xor.input(0)).unwrap();
        circuit.connect(b.output(0), xor.input(1)).unwrap();
        circuit.connect(a.output(0), and.input(0)).unwrap();
        circuit.connect(b.output(0), and.input(1)).unwrap();
        circuit.connect(xor.output(0), sum.input(0)).unwrap();
        circuit.connect(and.output(0), carry.input(0)).unwrap();
        circuit
    }

    #[test]
    fn test_boundary_ports_follow_position() {
        let definition = IcDefinition::from_circuit("half adder", half_adder()).unwrap();
        assert_eq!(definition.input_count(), 2);
        assert_eq!(definition.output_count(), 2);
    }

    #[test]
    fn test_instance_evaluates_inner_circuit() {
        let definition = IcDefinition::from_circuit("half adder", half_adder()).unwrap();
        let mut instance = IcInstance::new(&definition);
        assert_eq!(instance.evaluate(&[true, false]), vec![true, false]);
        assert_eq!(instance.evaluate(&[true, true]), vec![false, true]);
        assert_eq!(instance.evaluate(&[false, false]), vec![false, false]);
    }

    #[test]
    fn test_empty_circuit_is_rejected() {
        let result = IcDefinition::from_circuit("empty", Circuit::new());
        assert!(matches!(result, Err(CircuitError::PortRangeError(_))));
    }

    #[test]
    fn test_library_keeps_insertion_order() {
        let mut library = IcLibrary::new();
        let first = library.insert(IcDefinition::from_circuit("a", half_adder()).unwrap());
        let second = library.insert(IcDefinition::from_circuit("b", half_adder()).unwrap());
        let ids: Vec<_> = library.iter().map(|d| d.id()).collect();
        assert_eq!(ids, vec![first, second]);
        assert!(library.remove(&first).is_some());
        assert_eq!(library.len(), 1);
    }
}
