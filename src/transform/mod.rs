pub mod negate;
pub mod replace;

// Re-export commonly used types
pub use negate::{create_negated_gates_action, CircuitSubset};
pub use replace::{create_replace_component_action, Replacement};
