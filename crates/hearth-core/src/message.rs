//! Platform messages
//!
//! The outbound unit actions hand to the message bus, and the inbound body of
//! `MessageReceived` rule events. The bus itself is an external collaborator;
//! this core never blocks on a response.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Value;

/// A platform message: a type tag plus an attribute payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message type (e.g. `"swit:SetAttributes"`)
    pub message_type: String,

    /// Message payload
    #[serde(default)]
    pub attributes: HashMap<String, Value>,
}

impl Message {
    /// Create a message with an empty payload
    pub fn new(message_type: impl Into<String>) -> Self {
        Message {
            message_type: message_type.into(),
            attributes: HashMap::new(),
        }
    }

    /// Create a message with a payload
    pub fn with_attributes(
        message_type: impl Into<String>,
        attributes: HashMap<String, Value>,
    ) -> Self {
        Message {
            message_type: message_type.into(),
            attributes,
        }
    }

    /// Add one attribute (builder style)
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

/// Correlation id for request/response pairing on the bus
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generate a fresh correlation id
    pub fn generate() -> Self {
        CorrelationId(Uuid::new_v4().to_string())
    }

    /// Wrap an existing id
    pub fn new(id: impl Into<String>) -> Self {
        CorrelationId(id.into())
    }

    /// The id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
