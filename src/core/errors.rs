use thiserror::Error;

/// Errors raised by graph operations, action factories and the expression compiler.
///
/// All of them are raised before anything is mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CircuitError {
    /// Target component or wire is not owned by the circuit
    #[error("Not in circuit: {0}")]
    NotInCircuit(String),
    /// Replacement identifier does not resolve to a component kind or IC definition
    #[error("Invalid replacement: {0}")]
    InvalidReplacement(String),
    /// Port index or count outside the declared bounds, or an occupied input port
    #[error("Port range error: {0}")]
    PortRangeError(String),
    /// Malformed expression or notation
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Action executed twice without an undo in between, or undone before execution
    #[error("Invalid action state: {0}")]
    ActionState(String),
}

pub type Result<T> = std::result::Result<T, CircuitError>;
