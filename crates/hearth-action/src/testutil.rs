//! Shared test fixtures for the action framework

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use hearth_core::{Address, CorrelationId, Message, Model, Value};

use crate::action::{Action, ActionError, ActionResult};
use crate::context::ActionContext;

/// Action context recording every outbound message
pub struct TestActionContext {
    pub now: NaiveDateTime,
    pub models: Vec<Model>,
    pub variables: HashMap<String, Value>,
    pub sent: Vec<(Address, Message)>,
    pub broadcasts: Vec<Message>,
    pub requests: Vec<(Address, Message)>,
}

impl TestActionContext {
    pub fn new() -> Self {
        TestActionContext {
            now: NaiveDate::from_ymd_opt(2026, 3, 2)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            models: Vec::new(),
            variables: HashMap::new(),
            sent: Vec::new(),
            broadcasts: Vec::new(),
            requests: Vec::new(),
        }
    }
}

impl ActionContext for TestActionContext {
    fn local_time(&self) -> NaiveDateTime {
        self.now
    }

    fn models(&self) -> Vec<Model> {
        self.models.clone()
    }

    fn get_variable(&self, name: &str) -> Option<Value> {
        self.variables.get(name).cloned()
    }

    fn set_variable(&mut self, name: &str, value: Value) -> Option<Value> {
        self.variables.insert(name.to_string(), value)
    }

    fn remove_variable(&mut self, name: &str) -> Option<Value> {
        self.variables.remove(name)
    }

    fn send(&mut self, to: &Address, message: Message) {
        self.sent.push((to.clone(), message));
    }

    fn broadcast(&mut self, message: Message) {
        self.broadcasts.push(message);
    }

    fn request(&mut self, to: &Address, message: Message) -> CorrelationId {
        self.requests.push((to.clone(), message));
        CorrelationId::generate()
    }
}

/// Action that records its executions into a context variable list
pub struct MarkerAction {
    pub name: &'static str,
}

impl Action for MarkerAction {
    fn description(&self) -> String {
        format!("marker[{}]", self.name)
    }

    fn execute(&self, ctx: &mut dyn ActionContext) -> ActionResult<()> {
        let mut log = ctx
            .get_variable("executed")
            .and_then(|v| v.as_array().cloned())
            .unwrap_or_default();
        log.push(Value::String(self.name.to_string()));
        ctx.set_variable("executed", Value::Array(log));
        Ok(())
    }
}

/// Action that always fails
pub struct FailingAction;

impl Action for FailingAction {
    fn description(&self) -> String {
        "failing".to_string()
    }

    fn execute(&self, _ctx: &mut dyn ActionContext) -> ActionResult<()> {
        Err(ActionError::Execution("boom".to_string()))
    }
}
