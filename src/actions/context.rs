use super::selection::Selections;
use crate::core::circuit::Circuit;
use crate::core::components::IcLibrary;

/// Everything an action may read or change.
///
/// Passed explicitly to factories, actions and history instead of being
/// reachable globally.
#[derive(Debug, Clone, Default)]
pub struct DesignerContext {
    pub circuit: Circuit,
    pub selections: Selections,
    pub ic_library: IcLibrary,
}

impl DesignerContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context around an existing circuit with nothing selected
    pub fn with_circuit(circuit: Circuit) -> Self {
        Self {
            circuit,
            ..Self::default()
        }
    }
}
