//! Configuration for signal propagation
//!
//! This module provides configuration types for controlling how far a single
//! propagation pass may run before it is cut off.

/// Default bound on output activations processed in one pass
pub const DEFAULT_MAX_STEPS: usize = 100_000;

/// Configuration for propagation passes
///
/// Change detection ends a pass once no port changes value. Circuits that
/// never settle (an odd ring of inverters) are cut off after `max_steps`
/// activations instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropagationConfig {
    /// Maximum number of queued output activations processed in one pass
    pub max_steps: usize,
}

impl PropagationConfig {
    /// Create a new propagation configuration with default values
    pub fn new() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Set the activation limit for a single pass
    ///
    /// # Arguments
    /// * `max_steps` - The number of activations after which a pass stops
    ///
    /// # Returns
    /// A new configuration with the specified limit
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self::new()
    }
}
