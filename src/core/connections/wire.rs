use crate::core::types::{InputPortRef, OutputPortRef, WireId};
use serde::{Deserialize, Serialize};

/// A connection from exactly one output port to exactly one input port.
///
/// While it exists its value equals the driving output's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    pub(crate) id: WireId,
    pub(crate) from: OutputPortRef,
    pub(crate) to: InputPortRef,
    pub(crate) value: bool,
}

impl Wire {
    pub fn id(&self) -> WireId {
        self.id
    }

    /// Driving output port
    pub fn from(&self) -> OutputPortRef {
        self.from
    }

    /// Driven input port
    pub fn to(&self) -> InputPortRef {
        self.to
    }

    pub fn value(&self) -> bool {
        self.value
    }
}
