//! Action lists
//!
//! An ordered sequence of actions, each optionally executed under a variable
//! override scope. Failure of one entry is captured and logged; the remaining
//! entries always run.

use std::collections::HashMap;

use hearth_core::Value;
use tracing::error;

use crate::action::{Action, ActionError, ActionResult};
use crate::context::{ActionContext, ScopedContext};

struct Entry {
    action: Box<dyn Action>,
    variables: Option<HashMap<String, Value>>,
}

/// Ordered composite of actions with per-entry error isolation
pub struct ActionList {
    entries: Vec<Entry>,
}

impl ActionList {
    /// Start building a list
    pub fn builder() -> ActionListBuilder {
        ActionListBuilder {
            entries: Vec::new(),
        }
    }
}

impl Action for ActionList {
    fn description(&self) -> String {
        let children: Vec<String> = self
            .entries
            .iter()
            .map(|entry| entry.action.description())
            .collect();
        format!("list[{}]", children.join(", "))
    }

    fn execute(&self, ctx: &mut dyn ActionContext) -> ActionResult<()> {
        for entry in &self.entries {
            let result = match &entry.variables {
                Some(variables) => {
                    let mut scoped = ScopedContext::new(ctx, variables.clone());
                    entry.action.execute(&mut scoped)
                }
                None => entry.action.execute(ctx),
            };

            if let Err(e) = result {
                error!(
                    action = %entry.action.description(),
                    error = %e,
                    "action failed, continuing with remaining actions"
                );
            }
        }
        Ok(())
    }
}

/// Builder for [`ActionList`]; at least one entry is required
pub struct ActionListBuilder {
    entries: Vec<Entry>,
}

impl ActionListBuilder {
    /// Append an action executed against the firing context directly
    pub fn add(mut self, action: Box<dyn Action>) -> Self {
        self.entries.push(Entry {
            action,
            variables: None,
        });
        self
    }

    /// Append an action executed under a per-entry variable override scope
    pub fn add_with_variables(
        mut self,
        action: Box<dyn Action>,
        variables: HashMap<String, Value>,
    ) -> Self {
        self.entries.push(Entry {
            action,
            variables: Some(variables),
        });
        self
    }

    /// Finish building; fails on an empty list
    pub fn build(self) -> ActionResult<ActionList> {
        if self.entries.is_empty() {
            return Err(ActionError::InvalidConfig(
                "action list requires at least one action".to_string(),
            ));
        }
        Ok(ActionList {
            entries: self.entries,
        })
    }
}
