//! Time-window filters
//!
//! Conditions with a well-defined "active window" on the wall clock. The
//! window is pure arithmetic over local time ([`TimeWindow`]); [`WindowGate`]
//! adapts it to the filter machinery and self-schedules wake-ups at the
//! window edges so the dispatcher re-delivers a `Scheduled` event at the
//! moment the filter should flip.
//!
//! A scheduled event is evaluated against the timestamp it was *scheduled
//! for*, not the wall clock at processing time: the filter's state must match
//! what should have been true at the intended instant, however late the timer
//! delivery runs.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDateTime};
use hearth_core::{DayOfWeek, RuleEvent, RuleEventType, TimeOfDay, TimeRange};
use tracing::debug;

use crate::condition::{Condition, ConditionResult};
use crate::context::ConditionContext;
use crate::filter::{Filter, FilterGate, FilterMachine};

/// A wall-clock window with "next edge" arithmetic
///
/// All three functions are pure in `now`; the gate supplies the context's
/// local time or a scheduled event's intended timestamp.
pub trait TimeWindow: Send {
    /// Whether the window is open at `at`
    fn is_active_at(&self, at: NaiveDateTime) -> bool;

    /// The next instant after `now` at which the window opens
    ///
    /// `None` means the window never opens from here (permanently closed).
    fn activation_time(&self, now: NaiveDateTime) -> Option<NaiveDateTime>;

    /// The next instant after `now` at which the window closes
    ///
    /// `None` means the window never closes (permanently open).
    fn deactivation_time(&self, now: NaiveDateTime) -> Option<NaiveDateTime>;
}

/// Filter gate driven by a [`TimeWindow`]
///
/// Interested only in `Scheduled` events. Entering `Active` schedules a
/// wake-up at the next deactivation time, entering `Inactive` at the next
/// activation time; a window without such an edge schedules nothing, which
/// is logged and not an error.
pub struct WindowGate {
    window: Box<dyn TimeWindow>,
}

impl WindowGate {
    /// Create a gate around `window`
    pub fn new(window: Box<dyn TimeWindow>) -> Self {
        WindowGate { window }
    }
}

impl FilterGate for WindowGate {
    fn transitions_on(&self, event_type: RuleEventType) -> bool {
        event_type == RuleEventType::Scheduled
    }

    fn matches(&self, ctx: &dyn ConditionContext) -> ConditionResult<bool> {
        Ok(self.window.is_active_at(ctx.local_time()))
    }

    fn update(
        &mut self,
        ctx: &dyn ConditionContext,
        event: &RuleEvent,
    ) -> ConditionResult<bool> {
        // Dispatch jitter compensation: trust the intended instant.
        let at = event.scheduled_time().unwrap_or_else(|| ctx.local_time());
        Ok(self.window.is_active_at(at))
    }

    fn on_activated(&mut self, ctx: &dyn ConditionContext) {
        match self.window.deactivation_time(ctx.local_time()) {
            Some(at) => {
                debug!(%at, "window open, scheduling deactivation wake-up");
                ctx.wake_up_at(at);
            }
            None => debug!("window never closes, no wake-up scheduled"),
        }
    }

    fn on_deactivated(&mut self, ctx: &dyn ConditionContext) {
        match self.window.activation_time(ctx.local_time()) {
            Some(at) => {
                debug!(%at, "window closed, scheduling activation wake-up");
                ctx.wake_up_at(at);
            }
            None => debug!("window never opens, no wake-up scheduled"),
        }
    }
}

/// Daily window bounded by optional start and end times of day
///
/// Start inclusive, end exclusive; an absent start means midnight and an
/// absent end means midnight of the next day.
#[derive(Debug, Clone, Copy)]
pub struct TimeOfDayWindow {
    range: TimeRange,
}

impl TimeOfDayWindow {
    /// Create from a validated range
    pub fn new(range: TimeRange) -> Self {
        TimeOfDayWindow { range }
    }

    /// The underlying range
    pub fn range(&self) -> TimeRange {
        self.range
    }
}

impl TimeWindow for TimeOfDayWindow {
    fn is_active_at(&self, at: NaiveDateTime) -> bool {
        self.range.contains(at.time())
    }

    fn activation_time(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        Some(self.range.effective_start().next_occurrence_after(now))
    }

    fn deactivation_time(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        // An absent end bound defaults to midnight, i.e. the window closes
        // at the day boundary.
        Some(self.range.effective_end().next_occurrence_after(now))
    }
}

/// Weekly window: open on the days in a non-empty set
#[derive(Debug, Clone)]
pub struct DayOfWeekWindow {
    days: BTreeSet<DayOfWeek>,
}

impl DayOfWeekWindow {
    /// Create from a non-empty day set
    pub fn new(days: BTreeSet<DayOfWeek>) -> ConditionResult<Self> {
        if days.is_empty() {
            return Err(hearth_core::TimeError::EmptyDaySet.into());
        }
        Ok(DayOfWeekWindow { days })
    }

    /// The day set
    pub fn days(&self) -> &BTreeSet<DayOfWeek> {
        &self.days
    }

    /// Midnight of the first of the next 7 days whose membership equals `target`
    ///
    /// `None` only if no such day exists within a week, which cannot happen
    /// for a non-empty proper subset but is handled rather than assumed.
    fn next_edge(&self, now: NaiveDateTime, target: bool) -> Option<NaiveDateTime> {
        (1..=7u64)
            .map(|offset| now.date() + Days::new(offset))
            .find(|date| self.days.contains(&DayOfWeek::of(*date)) == target)
            .map(|date| date.and_time(chrono::NaiveTime::MIN))
    }
}

impl TimeWindow for DayOfWeekWindow {
    fn is_active_at(&self, at: NaiveDateTime) -> bool {
        self.days.contains(&DayOfWeek::of(at.date()))
    }

    fn activation_time(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        self.next_edge(now, true)
    }

    fn deactivation_time(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        self.next_edge(now, false)
    }
}

/// Filter gating `delegate` by a time-of-day window
///
/// At least one bound must be given; when both are, start must precede end.
pub fn time_of_day_filter(
    start: Option<TimeOfDay>,
    end: Option<TimeOfDay>,
    delegate: Box<dyn Condition>,
) -> ConditionResult<Filter> {
    let range = TimeRange::new(start, end)?;
    let gate = WindowGate::new(Box::new(TimeOfDayWindow::new(range)));
    Ok(FilterMachine::condition(Box::new(gate), delegate))
}

/// Filter gating `delegate` by a non-empty set of weekdays
pub fn day_of_week_filter(
    days: impl IntoIterator<Item = DayOfWeek>,
    delegate: Box<dyn Condition>,
) -> ConditionResult<Filter> {
    let window = DayOfWeekWindow::new(days.into_iter().collect())?;
    let gate = WindowGate::new(Box::new(window));
    Ok(FilterMachine::condition(Box::new(gate), delegate))
}
