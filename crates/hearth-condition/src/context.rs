//! Condition evaluation environment
//!
//! The context is owned by the rule-execution session and passed by reference
//! per event. It exposes the current local time (derived by the platform from
//! the place timezone), a live view of the model registry, and wake-up
//! scheduling against the external timer service.

use chrono::NaiveDateTime;
use hearth_core::Model;

/// Read access to the evaluation environment of a condition
pub trait ConditionContext {
    /// Current local wall-clock time
    fn local_time(&self) -> NaiveDateTime;

    /// Snapshot of the models currently visible to the rule
    ///
    /// The registry may change between consecutive events; callers must
    /// re-query rather than cache across events.
    fn models(&self) -> Vec<Model>;

    /// Request one future `Scheduled` event at `timestamp`
    ///
    /// Fire-and-forget: scheduling a new wake-up supersedes the previous one
    /// for the same condition, and there is no cancel. Stale deliveries are
    /// harmless because filters recompute activity from the event timestamp.
    fn wake_up_at(&self, timestamp: NaiveDateTime);
}
