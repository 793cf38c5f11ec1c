pub mod actions;
pub mod core;
pub mod expression;
pub mod transform;

// Re-export commonly used types
pub use crate::actions::{DesignerContext, GroupAction, History};
pub use crate::core::circuit::Circuit;
pub use crate::core::components::{Component, ComponentKind, IcDefinition, IcLibrary};
pub use crate::core::errors::{CircuitError, Result};
pub use crate::core::execution::{PropagationConfig, PropagationReport};
pub use crate::core::snapshot::CircuitSnapshot;
pub use crate::core::types::{ComponentId, InputPortRef, OutputPortRef, Position, WireId};
pub use crate::expression::{create_expression_circuit_action, ExpressionOptions, Notation};
pub use crate::transform::{
    create_negated_gates_action, create_replace_component_action, CircuitSubset, Replacement,
};
