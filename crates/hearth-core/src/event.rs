//! Rule events
//!
//! A `RuleEvent` is the unit of input delivered to a condition: a scheduled
//! wake-up from the timer service, an attribute change from the device
//! registry, or a generic platform message from the bus. The set of event
//! kinds is closed and known to every condition.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::message::Message;
use crate::model::Address;
use crate::Value;

/// The kind of a rule event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleEventType {
    /// A wake-up previously requested via `wake_up_at`
    Scheduled,

    /// A model attribute changed value
    ValueChanged,

    /// A platform message was received
    MessageReceived,
}

/// An event delivered to a condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RuleEvent {
    /// Scheduled wake-up, carrying the wall-clock instant it was scheduled for
    ///
    /// Delivery may lag arbitrarily behind the intended instant; time filters
    /// evaluate against this timestamp rather than processing time.
    Scheduled { timestamp: NaiveDateTime },

    /// Attribute change on a model
    ValueChanged {
        address: Address,
        attribute: String,

        #[serde(skip_serializing_if = "Option::is_none")]
        old: Option<Value>,

        #[serde(skip_serializing_if = "Option::is_none")]
        new: Option<Value>,
    },

    /// Generic platform message
    MessageReceived { source: Address, message: Message },
}

impl RuleEvent {
    /// Create a scheduled wake-up event
    pub fn scheduled(timestamp: NaiveDateTime) -> Self {
        RuleEvent::Scheduled { timestamp }
    }

    /// Create a value-change event
    pub fn value_changed(
        address: Address,
        attribute: impl Into<String>,
        old: Option<Value>,
        new: Option<Value>,
    ) -> Self {
        RuleEvent::ValueChanged {
            address,
            attribute: attribute.into(),
            old,
            new,
        }
    }

    /// Create a message-received event
    pub fn message_received(source: Address, message: Message) -> Self {
        RuleEvent::MessageReceived { source, message }
    }

    /// The event's kind
    pub fn event_type(&self) -> RuleEventType {
        match self {
            RuleEvent::Scheduled { .. } => RuleEventType::Scheduled,
            RuleEvent::ValueChanged { .. } => RuleEventType::ValueChanged,
            RuleEvent::MessageReceived { .. } => RuleEventType::MessageReceived,
        }
    }

    /// The scheduled timestamp, for scheduled events
    pub fn scheduled_time(&self) -> Option<NaiveDateTime> {
        match self {
            RuleEvent::Scheduled { timestamp } => Some(*timestamp),
            _ => None,
        }
    }
}
