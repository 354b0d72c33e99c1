//! Action execution environment
//!
//! The context an action executes against: variables scoped to the current
//! rule firing, a model snapshot, and the outbound side of the message bus.
//! Variable overrides are layered environments built per action or iteration
//! (a child map checked first, falling through to the parent) rather than
//! context subclasses.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use hearth_core::{Address, CorrelationId, Message, Model, Value};

/// The per-firing environment actions execute against
pub trait ActionContext {
    /// Current local wall-clock time
    fn local_time(&self) -> NaiveDateTime;

    /// Snapshot of the models currently visible to the rule
    fn models(&self) -> Vec<Model>;

    /// Read a variable
    fn get_variable(&self, name: &str) -> Option<Value>;

    /// Write a variable, returning the previous value if any
    fn set_variable(&mut self, name: &str, value: Value) -> Option<Value>;

    /// Remove a variable, returning its value if it was set
    fn remove_variable(&mut self, name: &str) -> Option<Value>;

    /// Send a command message to one address
    fn send(&mut self, to: &Address, message: Message);

    /// Broadcast a message to the platform
    fn broadcast(&mut self, message: Message);

    /// Send a request and return its correlation id without waiting
    fn request(&mut self, to: &Address, message: Message) -> CorrelationId;
}

/// Child context whose variable writes do not leak to the parent
///
/// Reads check the override layer first and fall through; writes and removals
/// stay in the layer. Messaging, models, and time pass straight through.
pub struct ScopedContext<'a> {
    parent: &'a mut dyn ActionContext,
    overrides: HashMap<String, Value>,
}

impl<'a> ScopedContext<'a> {
    /// Layer `variables` over `parent`
    pub fn new(parent: &'a mut dyn ActionContext, variables: HashMap<String, Value>) -> Self {
        ScopedContext {
            parent,
            overrides: variables,
        }
    }
}

impl ActionContext for ScopedContext<'_> {
    fn local_time(&self) -> NaiveDateTime {
        self.parent.local_time()
    }

    fn models(&self) -> Vec<Model> {
        self.parent.models()
    }

    fn get_variable(&self, name: &str) -> Option<Value> {
        self.overrides
            .get(name)
            .cloned()
            .or_else(|| self.parent.get_variable(name))
    }

    fn set_variable(&mut self, name: &str, value: Value) -> Option<Value> {
        self.overrides.insert(name.to_string(), value)
    }

    fn remove_variable(&mut self, name: &str) -> Option<Value> {
        self.overrides.remove(name)
    }

    fn send(&mut self, to: &Address, message: Message) {
        self.parent.send(to, message);
    }

    fn broadcast(&mut self, message: Message) {
        self.parent.broadcast(message);
    }

    fn request(&mut self, to: &Address, message: Message) -> CorrelationId {
        self.parent.request(to, message)
    }
}

/// Child context whose variable reads and writes are namespace-prefixed
pub struct NamespacedContext<'a> {
    parent: &'a mut dyn ActionContext,
    namespace: String,
}

impl<'a> NamespacedContext<'a> {
    /// Prefix all variable access on `parent` with `namespace`
    pub fn new(parent: &'a mut dyn ActionContext, namespace: impl Into<String>) -> Self {
        NamespacedContext {
            parent,
            namespace: namespace.into(),
        }
    }

    fn key(&self, name: &str) -> String {
        format!("{}:{}", self.namespace, name)
    }
}

impl ActionContext for NamespacedContext<'_> {
    fn local_time(&self) -> NaiveDateTime {
        self.parent.local_time()
    }

    fn models(&self) -> Vec<Model> {
        self.parent.models()
    }

    fn get_variable(&self, name: &str) -> Option<Value> {
        self.parent.get_variable(&self.key(name))
    }

    fn set_variable(&mut self, name: &str, value: Value) -> Option<Value> {
        self.parent.set_variable(&self.key(name), value)
    }

    fn remove_variable(&mut self, name: &str) -> Option<Value> {
        self.parent.remove_variable(&self.key(name))
    }

    fn send(&mut self, to: &Address, message: Message) {
        self.parent.send(to, message);
    }

    fn broadcast(&mut self, message: Message) {
        self.parent.broadcast(message);
    }

    fn request(&mut self, to: &Address, message: Message) -> CorrelationId {
        self.parent.request(to, message)
    }
}
