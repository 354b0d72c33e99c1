//! The action capability
//!
//! Actions are the side effects a rule performs when its condition fires:
//! sending commands, broadcasting events, logging. Each action is stateless;
//! all per-invocation state lives in the `ActionContext` variables, scoped to
//! one rule firing.

use thiserror::Error;

use crate::context::ActionContext;

/// Action errors
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Invalid action configuration: {0}")]
    InvalidConfig(String),

    #[error("Action execution failed: {0}")]
    Execution(String),
}

/// Result type for action execution
pub type ActionResult<T> = Result<T, ActionError>;

/// A side-effecting operation invoked when a condition fires
pub trait Action: Send {
    /// Human-readable description, used when logging failures
    fn description(&self) -> String;

    /// Perform the action against `ctx`
    ///
    /// Composite actions capture each entry's `Result`, log failures with the
    /// entry's description, and never short-circuit: one failing action must
    /// not block its siblings.
    fn execute(&self, ctx: &mut dyn ActionContext) -> ActionResult<()>;
}
