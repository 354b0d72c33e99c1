//! For-each-model action
//!
//! Iterates every model visible in the context, binds each matching model's
//! address into a named context variable, and executes a delegate action per
//! model. Errors from one iteration are logged and swallowed exactly like
//! [`crate::list::ActionList`] entries. After the loop the variable is reset
//! to its pre-loop value by an explicit restore into the same context, not a
//! scope exit.

use hearth_core::{Model, Value};
use tracing::{error, trace};

use crate::action::{Action, ActionResult};
use crate::context::ActionContext;

/// Selects which models the delegate runs for
pub type ModelPredicate = Box<dyn Fn(&Model) -> bool + Send + Sync>;

/// Runs a delegate action once per matching model
pub struct ForEachModelAction {
    predicate: ModelPredicate,
    variable: String,
    delegate: Box<dyn Action>,
}

impl ForEachModelAction {
    /// Run `delegate` for every model satisfying `predicate`, with the
    /// model's address bound to the `variable` context variable
    pub fn new(
        predicate: ModelPredicate,
        variable: impl Into<String>,
        delegate: Box<dyn Action>,
    ) -> Self {
        ForEachModelAction {
            predicate,
            variable: variable.into(),
            delegate,
        }
    }
}

impl Action for ForEachModelAction {
    fn description(&self) -> String {
        format!("for-each-model[{}]", self.delegate.description())
    }

    fn execute(&self, ctx: &mut dyn ActionContext) -> ActionResult<()> {
        let previous = ctx.get_variable(&self.variable);

        for model in ctx.models() {
            if !(self.predicate)(&model) {
                continue;
            }

            trace!(address = %model.address, variable = %self.variable, "executing per-model action");
            ctx.set_variable(
                &self.variable,
                Value::String(model.address.as_str().to_string()),
            );

            if let Err(e) = self.delegate.execute(ctx) {
                error!(
                    action = %self.delegate.description(),
                    address = %model.address,
                    error = %e,
                    "per-model action failed, continuing with remaining models"
                );
            }
        }

        // Unconditional restore of the bound variable.
        match previous {
            Some(value) => {
                ctx.set_variable(&self.variable, value);
            }
            None => {
                ctx.remove_variable(&self.variable);
            }
        }
        Ok(())
    }
}
