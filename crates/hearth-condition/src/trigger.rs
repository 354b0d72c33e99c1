//! Simple triggers
//!
//! Conditions with no persistent active/inactive notion: they fire directly
//! on a matching event while armed. Arming is just a flag; filters arm a
//! simple-trigger delegate early enough for it to evaluate the event that
//! activated the filter itself.

use hearth_core::{Address, RuleEvent, RuleEventType, Value};
use tracing::trace;

use crate::condition::{Condition, ConditionResult};
use crate::context::ConditionContext;

/// Fires when a model attribute changes, with optional old/new constraints
#[derive(Debug, Clone)]
pub struct ValueChangeTrigger {
    attribute: String,
    address: Option<Address>,
    from: Option<Value>,
    to: Option<Value>,
    armed: bool,
}

impl ValueChangeTrigger {
    /// Fire on any change of `attribute`
    pub fn new(attribute: impl Into<String>) -> Self {
        ValueChangeTrigger {
            attribute: attribute.into(),
            address: None,
            from: None,
            to: None,
            armed: false,
        }
    }

    /// Only fire for changes on this model
    pub fn for_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    /// Only fire when the old value equals `value`
    pub fn from(mut self, value: Value) -> Self {
        self.from = Some(value);
        self
    }

    /// Only fire when the new value equals `value`
    pub fn to(mut self, value: Value) -> Self {
        self.to = Some(value);
        self
    }

    fn event_matches(&self, event: &RuleEvent) -> bool {
        let RuleEvent::ValueChanged {
            address,
            attribute,
            old,
            new,
        } = event
        else {
            return false;
        };

        if *attribute != self.attribute {
            return false;
        }
        if let Some(expected) = &self.address {
            if address != expected {
                return false;
            }
        }
        if let Some(expected) = &self.from {
            if old.as_ref() != Some(expected) {
                return false;
            }
        }
        if let Some(expected) = &self.to {
            if new.as_ref() != Some(expected) {
                return false;
            }
        }
        true
    }
}

impl Condition for ValueChangeTrigger {
    fn is_satisfiable(&self, _ctx: &dyn ConditionContext) -> ConditionResult<bool> {
        Ok(true)
    }

    fn activate(&mut self, _ctx: &dyn ConditionContext) -> ConditionResult<()> {
        self.armed = true;
        Ok(())
    }

    fn deactivate(&mut self, _ctx: &dyn ConditionContext) {
        self.armed = false;
    }

    fn handles_event_of_type(&self, event_type: RuleEventType) -> bool {
        event_type == RuleEventType::ValueChanged
    }

    fn should_fire(
        &mut self,
        _ctx: &dyn ConditionContext,
        event: &RuleEvent,
    ) -> ConditionResult<bool> {
        if !self.armed {
            return Ok(false);
        }
        let fired = self.event_matches(event);
        trace!(attribute = %self.attribute, fired, "value change trigger evaluated");
        Ok(fired)
    }

    fn is_simple_trigger(&self) -> bool {
        true
    }
}

/// Fires when a platform message of a given type is received
#[derive(Debug, Clone)]
pub struct ReceivedMessageTrigger {
    message_type: String,
    source: Option<Address>,
    armed: bool,
}

impl ReceivedMessageTrigger {
    /// Fire on any message of `message_type`
    pub fn new(message_type: impl Into<String>) -> Self {
        ReceivedMessageTrigger {
            message_type: message_type.into(),
            source: None,
            armed: false,
        }
    }

    /// Only fire for messages from this source
    pub fn from_source(mut self, source: Address) -> Self {
        self.source = Some(source);
        self
    }
}

impl Condition for ReceivedMessageTrigger {
    fn is_satisfiable(&self, _ctx: &dyn ConditionContext) -> ConditionResult<bool> {
        Ok(true)
    }

    fn activate(&mut self, _ctx: &dyn ConditionContext) -> ConditionResult<()> {
        self.armed = true;
        Ok(())
    }

    fn deactivate(&mut self, _ctx: &dyn ConditionContext) {
        self.armed = false;
    }

    fn handles_event_of_type(&self, event_type: RuleEventType) -> bool {
        event_type == RuleEventType::MessageReceived
    }

    fn should_fire(
        &mut self,
        _ctx: &dyn ConditionContext,
        event: &RuleEvent,
    ) -> ConditionResult<bool> {
        if !self.armed {
            return Ok(false);
        }
        let RuleEvent::MessageReceived { source, message } = event else {
            return Ok(false);
        };
        if message.message_type != self.message_type {
            return Ok(false);
        }
        if let Some(expected) = &self.source {
            if source != expected {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn is_simple_trigger(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::TestContext;
    use hearth_core::Message;
    use serde_json::json;

    fn power_change(old: &str, new: &str) -> RuleEvent {
        RuleEvent::value_changed(
            Address::new("dev:switch-1"),
            "power",
            Some(json!(old)),
            Some(json!(new)),
        )
    }

    #[test]
    fn test_fires_only_while_armed() {
        let ctx = TestContext::at(2026, 3, 2, 12, 0);
        let mut trigger = ValueChangeTrigger::new("power");

        assert!(!trigger.should_fire(&ctx, &power_change("OFF", "ON")).unwrap());

        trigger.activate(&ctx).unwrap();
        assert!(trigger.should_fire(&ctx, &power_change("OFF", "ON")).unwrap());

        trigger.deactivate(&ctx);
        assert!(!trigger.should_fire(&ctx, &power_change("OFF", "ON")).unwrap());
    }

    #[test]
    fn test_from_to_constraints() {
        let ctx = TestContext::at(2026, 3, 2, 12, 0);
        let mut trigger = ValueChangeTrigger::new("power")
            .from(json!("OFF"))
            .to(json!("ON"));
        trigger.activate(&ctx).unwrap();

        assert!(trigger.should_fire(&ctx, &power_change("OFF", "ON")).unwrap());
        assert!(!trigger.should_fire(&ctx, &power_change("ON", "OFF")).unwrap());

        // Missing old value fails a `from` constraint.
        let no_old = RuleEvent::value_changed(
            Address::new("dev:switch-1"),
            "power",
            None,
            Some(json!("ON")),
        );
        assert!(!trigger.should_fire(&ctx, &no_old).unwrap());
    }

    #[test]
    fn test_address_constraint() {
        let ctx = TestContext::at(2026, 3, 2, 12, 0);
        let mut trigger =
            ValueChangeTrigger::new("power").for_address(Address::new("dev:switch-2"));
        trigger.activate(&ctx).unwrap();

        assert!(!trigger.should_fire(&ctx, &power_change("OFF", "ON")).unwrap());
    }

    #[test]
    fn test_other_attribute_ignored() {
        let ctx = TestContext::at(2026, 3, 2, 12, 0);
        let mut trigger = ValueChangeTrigger::new("power");
        trigger.activate(&ctx).unwrap();

        let humidity =
            RuleEvent::value_changed(Address::new("dev:switch-1"), "humidity", None, None);
        assert!(!trigger.should_fire(&ctx, &humidity).unwrap());
    }

    #[test]
    fn test_message_trigger() {
        let ctx = TestContext::at(2026, 3, 2, 12, 0);
        let mut trigger =
            ReceivedMessageTrigger::new("pres:Arrived").from_source(Address::new("svc:presence"));
        trigger.activate(&ctx).unwrap();

        let matching = RuleEvent::message_received(
            Address::new("svc:presence"),
            Message::new("pres:Arrived"),
        );
        assert!(trigger.should_fire(&ctx, &matching).unwrap());

        let wrong_type = RuleEvent::message_received(
            Address::new("svc:presence"),
            Message::new("pres:Departed"),
        );
        assert!(!trigger.should_fire(&ctx, &wrong_type).unwrap());

        let wrong_source =
            RuleEvent::message_received(Address::new("svc:other"), Message::new("pres:Arrived"));
        assert!(!trigger.should_fire(&ctx, &wrong_source).unwrap());
    }
}
