//! Configuration for expression circuit generation
//!
//! This module provides the layout spacing used when generated components are
//! arranged, and the options that control what the generator builds.

use super::notation::Notation;
use super::parser::DEFAULT_MAX_DEPTH;
use crate::core::components::ComponentKind;
use crate::core::types::Position;

pub const DEFAULT_COLUMN_SPACING: f32 = 150.0;
pub const DEFAULT_ROW_SPACING: f32 = 100.0;

/// Spacing for the depth-based layout pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Position of the top-left component
    pub origin: Position,
    /// Horizontal distance between depth columns
    pub column_spacing: f32,
    /// Vertical distance between components in one column
    pub row_spacing: f32,
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self {
            origin: Position::default(),
            column_spacing: DEFAULT_COLUMN_SPACING,
            row_spacing: DEFAULT_ROW_SPACING,
        }
    }

    pub fn with_origin(mut self, origin: Position) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_spacing(mut self, column_spacing: f32, row_spacing: f32) -> Self {
        self.column_spacing = column_spacing;
        self.row_spacing = row_spacing;
        self
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// What to generate from an expression
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionOptions {
    pub notation: Notation,
    /// Component created for every distinct input name
    pub input_kind: ComponentKind,
    /// Wrap the generated circuit into an IC and place a single instance
    pub as_ic: bool,
    /// IC name; the expression text is used when unset
    pub ic_name: Option<String>,
    pub layout: LayoutConfig,
    /// Deepest gate tree or bracket nesting the parser accepts
    pub max_depth: usize,
}

impl ExpressionOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self {
            notation: Notation::default(),
            input_kind: ComponentKind::Switch,
            as_ic: false,
            ic_name: None,
            layout: LayoutConfig::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_notation(mut self, notation: Notation) -> Self {
        self.notation = notation;
        self
    }

    /// Set the component kind used for inputs
    ///
    /// # Arguments
    /// * `input_kind` - Switch, Button, ConstantLow or ConstantHigh
    pub fn with_input_kind(mut self, input_kind: ComponentKind) -> Self {
        self.input_kind = input_kind;
        self
    }

    /// Generate an IC instead of loose components
    pub fn into_ic(mut self, name: Option<String>) -> Self {
        self.as_ic = true;
        self.ic_name = name;
        self
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ExpressionOptions {
    fn default() -> Self {
        Self::new()
    }
}
