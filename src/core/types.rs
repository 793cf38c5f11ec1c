use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a component placed in a circuit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(pub(crate) u64);

impl ComponentId {
    /// Create a component ID from its raw value
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw ID value
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Create an output port handle
    pub fn output(&self, index: usize) -> OutputPortRef {
        OutputPortRef {
            component_id: *self,
            index,
        }
    }

    /// Create an input port handle
    pub fn input(&self, index: usize) -> InputPortRef {
        InputPortRef {
            component_id: *self,
            index,
        }
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// Stable identifier of a wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WireId(pub(crate) u64);

impl WireId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for WireId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "W{}", self.0)
    }
}

/// Identifier of a reusable IC definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IcId(pub(crate) Uuid);

impl IcId {
    /// Generate a fresh random IC identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for IcId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IC-{}", self.0)
    }
}

/// Direction of a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortSide {
    /// Input port - receives a value from at most one wire
    Input,
    /// Output port - drives any number of wires
    Output,
}

impl std::fmt::Display for PortSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortSide::Input => write!(f, "Input"),
            PortSide::Output => write!(f, "Output"),
        }
    }
}

/// Handle for an output port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputPortRef {
    pub(crate) component_id: ComponentId,
    pub(crate) index: usize,
}

impl OutputPortRef {
    pub fn component_id(&self) -> ComponentId {
        self.component_id
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// Handle for an input port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputPortRef {
    pub(crate) component_id: ComponentId,
    pub(crate) index: usize,
}

impl InputPortRef {
    pub fn component_id(&self) -> ComponentId {
        self.component_id
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// 2D position in circuit space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Rotate this offset around the origin by `angle` radians
    pub fn rotated(&self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    pub fn offset(&self, other: Position) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}
