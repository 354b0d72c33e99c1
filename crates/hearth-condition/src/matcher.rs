//! Matcher filters
//!
//! Same Active/Inactive shape as the time-window filters, but gated by a
//! predicate over the models visible in the context rather than by the
//! clock. The matcher declares which event types force re-evaluation
//! (attribute changes, typically).

use hearth_core::{RuleEvent, RuleEventType, Value};
use regex::Regex;
use tracing::trace;

use crate::condition::{Condition, ConditionError, ConditionResult};
use crate::context::ConditionContext;
use crate::filter::{Filter, FilterGate, FilterMachine};

/// Predicate over the set of models visible in a context
pub trait ContextMatcher: Send {
    /// Whether the context currently matches
    fn matches(&self, ctx: &dyn ConditionContext) -> ConditionResult<bool>;

    /// Event types on which the matcher must be re-evaluated
    fn reevaluates_on(&self, event_type: RuleEventType) -> bool {
        event_type == RuleEventType::ValueChanged
    }

    /// Whether any currently visible model could satisfy the matcher
    fn is_satisfiable(&self, ctx: &dyn ConditionContext) -> ConditionResult<bool> {
        self.matches(ctx)
    }
}

/// Filter gate driven by a [`ContextMatcher`]
pub struct MatcherGate {
    matcher: Box<dyn ContextMatcher>,
}

impl MatcherGate {
    /// Create a gate around `matcher`
    pub fn new(matcher: Box<dyn ContextMatcher>) -> Self {
        MatcherGate { matcher }
    }
}

impl FilterGate for MatcherGate {
    fn transitions_on(&self, event_type: RuleEventType) -> bool {
        self.matcher.reevaluates_on(event_type)
    }

    fn matches(&self, ctx: &dyn ConditionContext) -> ConditionResult<bool> {
        self.matcher.matches(ctx)
    }

    fn update(
        &mut self,
        ctx: &dyn ConditionContext,
        _event: &RuleEvent,
    ) -> ConditionResult<bool> {
        self.matcher.matches(ctx)
    }

    fn is_satisfiable(&self, ctx: &dyn ConditionContext) -> ConditionResult<bool> {
        // The filter conjoins this with the delegate's own satisfiability:
        // both must hold for the composite to ever fire.
        self.matcher.is_satisfiable(ctx)
    }
}

/// Filter gating `delegate` by a context matcher
pub fn matcher_filter(matcher: Box<dyn ContextMatcher>, delegate: Box<dyn Condition>) -> Filter {
    FilterMachine::condition(Box::new(MatcherGate::new(matcher)), delegate)
}

/// How an attribute value is compared
pub enum ValueMatch {
    /// Exact value equality
    Equals(Value),

    /// Regex over the string form of the value (non-strings never match)
    Matches(Regex),

    /// The attribute merely has to be present
    Present,
}

/// Matches when any visible model has an attribute satisfying a [`ValueMatch`]
pub struct AttributeValueMatcher {
    attribute: String,
    expected: ValueMatch,
}

impl AttributeValueMatcher {
    /// Match models whose `attribute` equals `value`
    pub fn equals(attribute: impl Into<String>, value: Value) -> Self {
        AttributeValueMatcher {
            attribute: attribute.into(),
            expected: ValueMatch::Equals(value),
        }
    }

    /// Match models whose string-valued `attribute` matches `pattern`
    pub fn matching(attribute: impl Into<String>, pattern: &str) -> ConditionResult<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| ConditionError::InvalidConfig(format!("invalid pattern: {e}")))?;
        Ok(AttributeValueMatcher {
            attribute: attribute.into(),
            expected: ValueMatch::Matches(regex),
        })
    }

    /// Match models that carry `attribute` at all
    pub fn present(attribute: impl Into<String>) -> Self {
        AttributeValueMatcher {
            attribute: attribute.into(),
            expected: ValueMatch::Present,
        }
    }

    fn value_matches(&self, value: &Value) -> bool {
        match &self.expected {
            ValueMatch::Equals(expected) => value == expected,
            ValueMatch::Matches(regex) => value.as_str().is_some_and(|s| regex.is_match(s)),
            ValueMatch::Present => true,
        }
    }
}

impl ContextMatcher for AttributeValueMatcher {
    fn matches(&self, ctx: &dyn ConditionContext) -> ConditionResult<bool> {
        let matched = ctx
            .models()
            .iter()
            .any(|model| {
                model
                    .get_attribute(&self.attribute)
                    .is_some_and(|value| self.value_matches(value))
            });
        trace!(attribute = %self.attribute, matched, "attribute matcher evaluated");
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterState;
    use crate::testutil::{RecordingTrigger, TestContext};
    use hearth_core::{Address, Model};
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn ctx_with_thermostat(mode: &str) -> TestContext {
        let ctx = TestContext::at(2026, 3, 2, 12, 0);
        ctx.add_model(Model::new("dev:therm-1").with_attribute("mode", json!(mode)));
        ctx
    }

    #[test]
    fn test_equals_matcher() {
        let matcher = AttributeValueMatcher::equals("mode", json!("heat"));
        assert!(matcher.matches(&ctx_with_thermostat("heat")).unwrap());
        assert!(!matcher.matches(&ctx_with_thermostat("cool")).unwrap());
    }

    #[test]
    fn test_regex_matcher() {
        let matcher = AttributeValueMatcher::matching("mode", "^heat").unwrap();
        assert!(matcher.matches(&ctx_with_thermostat("heat-eco")).unwrap());
        assert!(!matcher.matches(&ctx_with_thermostat("cool")).unwrap());

        assert!(AttributeValueMatcher::matching("mode", "h(eat").is_err());
    }

    #[test]
    fn test_regex_matcher_ignores_non_strings() {
        let ctx = TestContext::at(2026, 3, 2, 12, 0);
        ctx.add_model(Model::new("dev:a").with_attribute("mode", json!(42)));

        let matcher = AttributeValueMatcher::matching("mode", ".*").unwrap();
        assert!(!matcher.matches(&ctx).unwrap());
    }

    #[test]
    fn test_present_matcher() {
        let matcher = AttributeValueMatcher::present("mode");
        assert!(matcher.matches(&ctx_with_thermostat("anything")).unwrap());

        let empty = TestContext::at(2026, 3, 2, 12, 0);
        assert!(!matcher.matches(&empty).unwrap());
    }

    #[test]
    fn test_matcher_filter_unsatisfiable_without_matching_model() {
        let ctx = ctx_with_thermostat("cool");
        let armed = Arc::new(AtomicBool::new(false));
        let filter = matcher_filter(
            Box::new(AttributeValueMatcher::equals("mode", json!("heat"))),
            Box::new(RecordingTrigger::new(armed)),
        );

        assert!(!filter.is_satisfiable(&ctx).unwrap());
    }

    #[test]
    fn test_matcher_filter_arms_trigger_on_the_flipping_event() {
        let ctx = ctx_with_thermostat("cool");
        let armed = Arc::new(AtomicBool::new(false));
        let mut filter = matcher_filter(
            Box::new(AttributeValueMatcher::equals("mode", json!("heat"))),
            Box::new(RecordingTrigger::new(armed.clone())),
        );

        filter.activate(&ctx).unwrap();
        assert_eq!(filter.state(), Some(&FilterState::Inactive));

        // The registry now reports mode=heat, and the very event announcing
        // a power change both opens the gate and matches the trigger.
        ctx.set_models(vec![Model::new("dev:therm-1")
            .with_attribute("mode", json!("heat"))
            .with_attribute("power", json!("ON"))]);
        let event = RuleEvent::value_changed(
            Address::new("dev:therm-1"),
            "power",
            Some(json!("OFF")),
            Some(json!("ON")),
        );

        assert!(filter.on_event(&ctx, &event).unwrap());
        assert_eq!(filter.state(), Some(&FilterState::Active));
        assert!(armed.load(Ordering::SeqCst));
    }

    #[test]
    fn test_matcher_gate_not_reevaluated_on_scheduled_events() {
        let matcher = AttributeValueMatcher::equals("mode", json!("heat"));
        assert!(matcher.reevaluates_on(RuleEventType::ValueChanged));
        assert!(!matcher.reevaluates_on(RuleEventType::Scheduled));
        assert!(!matcher.reevaluates_on(RuleEventType::MessageReceived));
    }
}
