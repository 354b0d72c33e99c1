//! Send action
//!
//! Resolves a destination address and an attribute payload at fire-time and
//! emits one outbound command message. Destination and attributes may be
//! configured statically, computed from the context, or (template mode) read
//! from the well-known `to` / `attributes` context variables. A missing
//! destination is a warning and a no-op, never an error.

use std::collections::HashMap;

use hearth_core::{Address, Message, Value};
use tracing::{debug, warn};

use crate::action::{Action, ActionResult};
use crate::context::ActionContext;

/// Context variable holding the destination address in template mode
pub const VAR_TO: &str = "to";

/// Context variable holding the attribute payload in template mode
pub const VAR_ATTRIBUTES: &str = "attributes";

/// Computes the destination address from the context at fire-time
pub type AddressResolver = Box<dyn Fn(&dyn ActionContext) -> Option<Address> + Send + Sync>;

/// Computes one attribute value from the context at fire-time
pub type AttributeResolver = Box<dyn Fn(&dyn ActionContext) -> Value + Send + Sync>;

/// Sends one command message when the rule fires
pub struct SendAction {
    message_type: String,
    destination: Option<AddressResolver>,
    attributes: HashMap<String, Value>,
    dynamic_attributes: Vec<(String, AttributeResolver)>,
}

impl SendAction {
    /// Start building a send action for `message_type`
    pub fn builder(message_type: impl Into<String>) -> SendActionBuilder {
        SendActionBuilder {
            action: SendAction {
                message_type: message_type.into(),
                destination: None,
                attributes: HashMap::new(),
                dynamic_attributes: Vec::new(),
            },
        }
    }

    fn resolve_destination(&self, ctx: &dyn ActionContext) -> Option<Address> {
        match &self.destination {
            Some(resolver) => resolver(ctx),
            None => ctx
                .get_variable(VAR_TO)
                .and_then(|v| v.as_str().map(Address::new)),
        }
    }

    fn resolve_attributes(&self, ctx: &dyn ActionContext) -> HashMap<String, Value> {
        if self.attributes.is_empty() && self.dynamic_attributes.is_empty() {
            // Template mode: the payload comes from the context.
            return match ctx.get_variable(VAR_ATTRIBUTES) {
                Some(Value::Object(map)) => map.into_iter().collect(),
                Some(other) => {
                    warn!(value = %other, "'{VAR_ATTRIBUTES}' variable is not an object, sending empty payload");
                    HashMap::new()
                }
                None => HashMap::new(),
            };
        }

        let mut attributes = self.attributes.clone();
        for (key, resolver) in &self.dynamic_attributes {
            attributes.insert(key.clone(), resolver(ctx));
        }
        attributes
    }
}

impl Action for SendAction {
    fn description(&self) -> String {
        format!("send[{}]", self.message_type)
    }

    fn execute(&self, ctx: &mut dyn ActionContext) -> ActionResult<()> {
        let Some(to) = self.resolve_destination(ctx) else {
            warn!(
                message_type = %self.message_type,
                "no destination resolved for send action, nothing sent"
            );
            return Ok(());
        };

        let attributes = self.resolve_attributes(ctx);
        debug!(%to, message_type = %self.message_type, "sending command");
        ctx.send(
            &to,
            Message::with_attributes(self.message_type.clone(), attributes),
        );
        Ok(())
    }
}

/// Builder for [`SendAction`]
pub struct SendActionBuilder {
    action: SendAction,
}

impl SendActionBuilder {
    /// Fixed destination address
    pub fn to(mut self, address: Address) -> Self {
        self.action.destination = Some(Box::new(move |_| Some(address.clone())));
        self
    }

    /// Destination computed from the context at fire-time
    pub fn destination<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&dyn ActionContext) -> Option<Address> + Send + Sync + 'static,
    {
        self.action.destination = Some(Box::new(resolver));
        self
    }

    /// Add a static attribute
    pub fn attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.action.attributes.insert(key.into(), value);
        self
    }

    /// Add a batch of static attributes
    pub fn attributes(mut self, attributes: HashMap<String, Value>) -> Self {
        self.action.attributes.extend(attributes);
        self
    }

    /// Add an attribute computed from the context at fire-time
    ///
    /// Dynamic entries win over static entries with the same key.
    pub fn dynamic_attribute<F>(mut self, key: impl Into<String>, resolver: F) -> Self
    where
        F: Fn(&dyn ActionContext) -> Value + Send + Sync + 'static,
    {
        self.action
            .dynamic_attributes
            .push((key.into(), Box::new(resolver)));
        self
    }

    /// Finish building
    pub fn build(self) -> SendAction {
        self.action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::TestActionContext;
    use serde_json::json;

    #[test]
    fn test_send_with_fixed_destination_and_static_attributes() {
        let mut ctx = TestActionContext::new();
        let action = SendAction::builder("swit:SetAttributes")
            .to(Address::new("dev:switch-1"))
            .attribute("power", json!("ON"))
            .build();

        action.execute(&mut ctx).unwrap();

        assert_eq!(ctx.sent.len(), 1);
        let (to, message) = &ctx.sent[0];
        assert_eq!(to, &Address::new("dev:switch-1"));
        assert_eq!(message.message_type, "swit:SetAttributes");
        assert_eq!(message.attributes.get("power"), Some(&json!("ON")));
    }

    #[test]
    fn test_missing_destination_warns_and_sends_nothing() {
        // Static attributes, no destination function, 'to' variable unset.
        let mut ctx = TestActionContext::new();
        let action = SendAction::builder("swit:SetAttributes")
            .attribute("power", json!("ON"))
            .build();

        assert!(action.execute(&mut ctx).is_ok());
        assert!(ctx.sent.is_empty());
    }

    #[test]
    fn test_template_mode_reads_context_variables() {
        let mut ctx = TestActionContext::new();
        ctx.set_variable(VAR_TO, json!("dev:dimmer-2"));
        ctx.set_variable(VAR_ATTRIBUTES, json!({"level": 40}));

        let action = SendAction::builder("dim:SetLevel").build();
        action.execute(&mut ctx).unwrap();

        let (to, message) = &ctx.sent[0];
        assert_eq!(to, &Address::new("dev:dimmer-2"));
        assert_eq!(message.attributes.get("level"), Some(&json!(40)));
    }

    #[test]
    fn test_dynamic_attributes_merge_over_static() {
        let mut ctx = TestActionContext::new();
        ctx.set_variable("target_level", json!(75));

        let action = SendAction::builder("dim:SetLevel")
            .to(Address::new("dev:dimmer-1"))
            .attribute("level", json!(10))
            .attribute("ramp", json!(2))
            .dynamic_attribute("level", |ctx| {
                ctx.get_variable("target_level").unwrap_or(json!(0))
            })
            .build();

        action.execute(&mut ctx).unwrap();

        let (_, message) = &ctx.sent[0];
        assert_eq!(message.attributes.get("level"), Some(&json!(75)));
        assert_eq!(message.attributes.get("ramp"), Some(&json!(2)));
    }

    #[test]
    fn test_destination_resolver_returning_none_is_a_no_op() {
        let mut ctx = TestActionContext::new();
        let action = SendAction::builder("swit:SetAttributes")
            .destination(|_| None)
            .attribute("power", json!("ON"))
            .build();

        assert!(action.execute(&mut ctx).is_ok());
        assert!(ctx.sent.is_empty());
    }
}
