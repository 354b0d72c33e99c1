//! Condition engine for the Hearth rule core
//!
//! This crate decides, for a single automation rule, when its trigger
//! condition is currently true. Conditions are explicit state machines fed
//! `RuleEvent`s by an external dispatcher:
//!
//! ```text
//! RULE = CONDITION (filters wrapping a trigger) -> fires -> ACTIONS
//! ```
//!
//! - **Simple triggers** fire directly on a matching event while armed
//! - **Filters** wrap a delegate condition and gate whether its firing is
//!   observed (by time of day, day of week, or a model attribute predicate)
//! - **[`StatefulCondition`]** is the generic driver holding the current
//!   state, feeding it events, and exposing firing status
//!
//! Time filters self-schedule wake-ups through
//! [`ConditionContext::wake_up_at`]; the dispatcher re-delivers a `Scheduled`
//! event at the requested instant. Evaluation is single-threaded per rule:
//! every event is fully processed before the next one is delivered.

pub mod condition;
pub mod context;
pub mod filter;
pub mod matcher;
pub mod state;
pub mod trigger;
pub mod window;

#[cfg(test)]
pub(crate) mod testutil;

pub use condition::{Condition, ConditionError, ConditionResult};
pub use context::ConditionContext;
pub use filter::{Filter, FilterGate, FilterMachine, FilterState};
pub use matcher::{
    matcher_filter, AttributeValueMatcher, ContextMatcher, MatcherGate, ValueMatch,
};
pub use state::{StateMachine, StatefulCondition, Transition};
pub use trigger::{ReceivedMessageTrigger, ValueChangeTrigger};
pub use window::{
    day_of_week_filter, time_of_day_filter, DayOfWeekWindow, TimeOfDayWindow, TimeWindow,
    WindowGate,
};
