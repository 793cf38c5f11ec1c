use super::port_validator::PortValidator;
use crate::core::circuit::Circuit;
use crate::core::errors::{CircuitError, Result};
use crate::core::types::{InputPortRef, OutputPortRef, WireId};

/// Centralized connection validation for the circuit graph
pub struct ConnectionValidator;

impl ConnectionValidator {
    /// Validate a port-to-port connection without mutating anything
    pub fn validate_connection(
        circuit: &Circuit,
        source: &OutputPortRef,
        target: &InputPortRef,
    ) -> Result<()> {
        // Validate that source component exists
        let source_component = circuit.component(source.component_id()).ok_or_else(|| {
            CircuitError::NotInCircuit(format!(
                "Source component {} not found",
                source.component_id()
            ))
        })?;

        // Validate that target component exists
        let target_component = circuit.component(target.component_id()).ok_or_else(|| {
            CircuitError::NotInCircuit(format!(
                "Target component {} not found",
                target.component_id()
            ))
        })?;

        PortValidator::validate_source_port(source_component, source.index())?;
        PortValidator::validate_target_port(target_component, target.index())?;
        PortValidator::check_input_port_collision(target_component, target.index())?;

        Ok(())
    }

    /// Validate that a wire can be removed
    pub fn validate_disconnection(circuit: &Circuit, wire: WireId) -> Result<()> {
        if !circuit.contains_wire(wire) {
            return Err(CircuitError::NotInCircuit(format!("Wire {} not found", wire)));
        }
        Ok(())
    }
}
