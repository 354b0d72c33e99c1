//! The condition capability
//!
//! A condition evaluates to active/inactive and may additionally fire on
//! specific events. Filters compose by owning a boxed delegate condition;
//! composition is by ownership, never by inheritance.

use hearth_core::{RuleEvent, RuleEventType};
use thiserror::Error;

use crate::context::ConditionContext;

/// Condition errors
#[derive(Debug, Error)]
pub enum ConditionError {
    #[error("Invalid condition configuration: {0}")]
    InvalidConfig(String),

    #[error("Evaluation failed: {0}")]
    Evaluation(String),
}

impl From<hearth_core::TimeError> for ConditionError {
    fn from(e: hearth_core::TimeError) -> Self {
        ConditionError::InvalidConfig(e.to_string())
    }
}

/// Result type for condition operations
pub type ConditionResult<T> = Result<T, ConditionError>;

/// A component that evaluates to active/inactive and may fire on events
///
/// Evaluation errors propagate to the caller; the dispatcher logs them and
/// treats the rule as not firing for that event.
pub trait Condition: Send {
    /// Whether this condition could ever fire against the current context
    fn is_satisfiable(&self, ctx: &dyn ConditionContext) -> ConditionResult<bool>;

    /// Arm the condition against the current context
    ///
    /// For stateful conditions this computes the initial state; arming never
    /// counts as firing, whatever state it lands in.
    fn activate(&mut self, ctx: &dyn ConditionContext) -> ConditionResult<()>;

    /// Disarm the condition and discard its state
    fn deactivate(&mut self, ctx: &dyn ConditionContext);

    /// Whether the condition observes events of this type in its current state
    fn handles_event_of_type(&self, event_type: RuleEventType) -> bool;

    /// Feed one event; returns whether the condition is now firing
    ///
    /// The returned flag is valid only for this event. Delivering the next
    /// event clears it unless the condition explicitly re-affirms.
    fn should_fire(
        &mut self,
        ctx: &dyn ConditionContext,
        event: &RuleEvent,
    ) -> ConditionResult<bool>;

    /// Whether this is a simple trigger (no persistent active/inactive notion)
    ///
    /// Filters arm simple-trigger delegates before letting them evaluate the
    /// event that activated the filter itself.
    fn is_simple_trigger(&self) -> bool {
        false
    }
}
