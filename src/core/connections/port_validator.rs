use crate::core::components::Component;
use crate::core::errors::{CircuitError, Result};

/// Port validation utilities for components
pub struct PortValidator;

impl PortValidator {
    /// Validate that a component has the specified output port
    pub fn validate_source_port(component: &Component, index: usize) -> Result<()> {
        if index >= component.output_count() {
            return Err(CircuitError::PortRangeError(format!(
                "Output port {} not found on component {} ({}). Valid output ports: 0..{}",
                index,
                component.id(),
                component.kind(),
                component.output_count()
            )));
        }
        Ok(())
    }

    /// Validate that a component has the specified input port
    pub fn validate_target_port(component: &Component, index: usize) -> Result<()> {
        if index >= component.input_count() {
            return Err(CircuitError::PortRangeError(format!(
                "Input port {} not found on component {} ({}). Valid input ports: 0..{}",
                index,
                component.id(),
                component.kind(),
                component.input_count()
            )));
        }
        Ok(())
    }

    /// Check that an input port has no wire yet (prevents multiple drivers)
    pub fn check_input_port_collision(component: &Component, index: usize) -> Result<()> {
        if let Some(existing) = component.inputs().get(index).and_then(|port| port.wire()) {
            return Err(CircuitError::PortRangeError(format!(
                "Input port {} on component {} is already connected by {}. \
                 Multiple drivers not allowed.",
                index,
                component.id(),
                existing
            )));
        }
        Ok(())
    }
}
