use super::action::Action;
use super::context::DesignerContext;
use crate::core::errors::{CircuitError, Result};
use log::{debug, warn};

/// Ordered sequence of actions applied as one unit.
///
/// Members execute front to back and undo back to front, so a connection is
/// always torn down before the placement it depends on. Factories build
/// groups with [`GroupAction::apply`], which performs each member as it is
/// added: a finished group has already taken effect.
#[derive(Debug, Clone)]
pub struct GroupAction {
    name: String,
    info: Vec<String>,
    actions: Vec<Action>,
    executed: bool,
}

impl GroupAction {
    /// Create an empty, already executed group
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            info: Vec::new(),
            actions: Vec::new(),
            executed: true,
        }
    }

    /// Attach a descriptive line for history panels
    pub fn with_info(mut self, line: impl Into<String>) -> Self {
        self.info.push(line.into());
        self
    }

    pub fn add_info(&mut self, line: impl Into<String>) {
        self.info.push(line.into());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn info(&self) -> &[String] {
        &self.info
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn is_executed(&self) -> bool {
        self.executed
    }

    /// Execute `action` now and append it.
    ///
    /// If the action fails, every member applied so far is undone before the
    /// error is returned, leaving the context as it was before the group was
    /// started.
    pub fn apply(&mut self, ctx: &mut DesignerContext, mut action: Action) -> Result<()> {
        if !self.executed {
            return Err(CircuitError::ActionState(format!(
                "Cannot extend '{}' while it is undone",
                self.name
            )));
        }
        if let Err(e) = action.execute(ctx) {
            warn!("'{}' failed at {}: {}", self.name, action.name(), e);
            self.rollback(ctx, self.actions.len());
            self.actions.clear();
            return Err(e);
        }
        self.actions.push(action);
        Ok(())
    }

    /// Append a group that has already been executed
    pub fn append(&mut self, group: GroupAction) -> Result<()> {
        if !group.executed || !self.executed {
            return Err(CircuitError::ActionState(format!(
                "Cannot nest '{}' into '{}' in a different execution state",
                group.name, self.name
            )));
        }
        if !group.is_empty() {
            self.actions.push(Action::Group(group));
        }
        Ok(())
    }

    /// Apply every member front to back
    pub fn execute(&mut self, ctx: &mut DesignerContext) -> Result<()> {
        if self.executed {
            return Err(CircuitError::ActionState(format!(
                "'{}' was already executed",
                self.name
            )));
        }
        for index in 0..self.actions.len() {
            if let Err(e) = self.actions[index].execute(ctx) {
                warn!("Redo of '{}' failed at step {}: {}", self.name, index, e);
                self.rollback(ctx, index);
                return Err(e);
            }
        }
        self.executed = true;
        debug!("Executed '{}' ({} actions)", self.name, self.actions.len());
        Ok(())
    }

    /// Revert every member back to front
    pub fn undo(&mut self, ctx: &mut DesignerContext) -> Result<()> {
        if !self.executed {
            return Err(CircuitError::ActionState(format!(
                "'{}' has not been executed",
                self.name
            )));
        }
        for index in (0..self.actions.len()).rev() {
            if let Err(e) = self.actions[index].undo(ctx) {
                warn!("Undo of '{}' failed at step {}: {}", self.name, index, e);
                // Re-apply what was already undone so the group stays executed
                for redo in index + 1..self.actions.len() {
                    if let Err(e) = self.actions[redo].execute(ctx) {
                        warn!("Could not restore step {} of '{}': {}", redo, self.name, e);
                    }
                }
                return Err(e);
            }
        }
        self.executed = false;
        debug!("Undid '{}' ({} actions)", self.name, self.actions.len());
        Ok(())
    }

    /// Undo the first `count` members in reverse order
    fn rollback(&mut self, ctx: &mut DesignerContext, count: usize) {
        for action in self.actions[..count].iter_mut().rev() {
            if let Err(e) = action.undo(ctx) {
                warn!("Rollback of {} in '{}' failed: {}", action.name(), self.name, e);
            }
        }
    }
}
