use super::context::DesignerContext;
use super::group::GroupAction;
use crate::core::errors::{CircuitError, Result};
use log::debug;
use std::collections::VecDeque;

/// Linear undo/redo history of executed group actions.
///
/// Unlimited by default. Recording a new action clears the redo stack.
#[derive(Debug, Default)]
pub struct History {
    undo_stack: VecDeque<GroupAction>,
    redo_stack: Vec<GroupAction>,
    max_depth: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// History that forgets its oldest entries beyond `max_depth`
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth.max(1)),
            ..Self::default()
        }
    }

    /// Record an action that has already been executed.
    ///
    /// Empty groups are ignored; they have nothing to undo.
    pub fn push(&mut self, action: GroupAction) -> Result<()> {
        if !action.is_executed() {
            return Err(CircuitError::ActionState(format!(
                "'{}' must be executed before it is recorded",
                action.name()
            )));
        }
        if action.is_empty() {
            return Ok(());
        }

        debug!("Recording '{}'", action.name());
        self.undo_stack.push_back(action);
        self.redo_stack.clear();
        if let Some(max_depth) = self.max_depth {
            while self.undo_stack.len() > max_depth {
                self.undo_stack.pop_front();
            }
        }
        Ok(())
    }

    /// Undo the latest action, returning false if there was none
    pub fn undo(&mut self, ctx: &mut DesignerContext) -> Result<bool> {
        let Some(mut action) = self.undo_stack.pop_back() else {
            return Ok(false);
        };
        if let Err(e) = action.undo(ctx) {
            self.undo_stack.push_back(action);
            return Err(e);
        }
        debug!("Undo '{}'", action.name());
        self.redo_stack.push(action);
        Ok(true)
    }

    /// Redo the latest undone action, returning false if there was none
    pub fn redo(&mut self, ctx: &mut DesignerContext) -> Result<bool> {
        let Some(mut action) = self.redo_stack.pop() else {
            return Ok(false);
        };
        if let Err(e) = action.execute(ctx) {
            self.redo_stack.push(action);
            return Err(e);
        }
        debug!("Redo '{}'", action.name());
        self.undo_stack.push_back(action);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Names of recorded actions, oldest first
    pub fn undo_names(&self) -> Vec<&str> {
        self.undo_stack.iter().map(|action| action.name()).collect()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
