//! Core types for the Hearth rule engine
//!
//! This crate provides the fundamental value types shared by the condition
//! and action crates: wall-clock primitives (TimeOfDay, DayOfWeek, TimeRange),
//! rule events, model/address types, and platform messages.
//!
//! Everything here is a plain value. The live collaborators behind these
//! values (the device registry, the message bus, the timer service) are owned
//! by the platform and reached through the context traits in
//! `hearth-condition` and `hearth-action`.

mod event;
mod message;
mod model;
mod time;

pub use event::{RuleEvent, RuleEventType};
pub use message::{CorrelationId, Message};
pub use model::{Address, InMemoryModelStore, Model, ModelStore};
pub use time::{DayOfWeek, TimeError, TimeOfDay, TimeRange};

/// Attribute and variable values throughout the rule engine
pub type Value = serde_json::Value;
