pub mod component;
pub mod ic;
pub mod types;

// Re-export commonly used types
pub use component::{Component, InputPort, OutputPort};
pub use ic::{IcDefinition, IcInstance, IcLibrary};
pub use types::{ComponentKind, PortBounds, SELECT_BOUNDS};
