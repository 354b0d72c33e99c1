//! Log action
//!
//! Emits a message at info level when the rule fires. The message comes from
//! a fixed string or the well-known `message` context variable; when neither
//! resolves, a warning is emitted instead. Never errors.

use tracing::{info, warn};

use crate::action::{Action, ActionResult};
use crate::context::ActionContext;

/// Context variable holding the message in template mode
pub const VAR_MESSAGE: &str = "message";

/// Logs a message when the rule fires
#[derive(Debug, Clone, Default)]
pub struct LogAction {
    message: Option<String>,
}

impl LogAction {
    /// Log a fixed message
    pub fn with_message(message: impl Into<String>) -> Self {
        LogAction {
            message: Some(message.into()),
        }
    }

    /// Log whatever the `message` context variable holds at fire-time
    pub fn from_variable() -> Self {
        LogAction { message: None }
    }

    fn resolve(&self, ctx: &dyn ActionContext) -> Option<String> {
        self.message.clone().or_else(|| {
            ctx.get_variable(VAR_MESSAGE)
                .and_then(|v| v.as_str().map(str::to_string))
        })
    }
}

impl Action for LogAction {
    fn description(&self) -> String {
        "log".to_string()
    }

    fn execute(&self, ctx: &mut dyn ActionContext) -> ActionResult<()> {
        match self.resolve(ctx) {
            Some(message) => info!(rule_message = %message, "rule fired"),
            None => warn!("log action has no message configured and no 'message' variable set"),
        }
        Ok(())
    }
}
