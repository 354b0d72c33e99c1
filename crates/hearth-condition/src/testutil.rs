//! Shared test fixtures for the condition engine

use std::cell::{Cell, RefCell};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use hearth_core::{Model, RuleEvent, RuleEventType};

use crate::condition::{Condition, ConditionResult};
use crate::context::ConditionContext;

/// Condition context with a settable clock, a model list, and a wake-up log
pub struct TestContext {
    now: Cell<NaiveDateTime>,
    models: RefCell<Vec<Model>>,
    wake_ups: RefCell<Vec<NaiveDateTime>>,
}

impl TestContext {
    pub fn new(now: NaiveDateTime) -> Self {
        TestContext {
            now: Cell::new(now),
            models: RefCell::new(Vec::new()),
            wake_ups: RefCell::new(Vec::new()),
        }
    }

    pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Self {
        Self::new(
            NaiveDate::from_ymd_opt(year, month, day)
                .unwrap()
                .and_hms_opt(hour, minute, 0)
                .unwrap(),
        )
    }

    pub fn set_now(&self, now: NaiveDateTime) {
        self.now.set(now);
    }

    pub fn add_model(&self, model: Model) {
        self.models.borrow_mut().push(model);
    }

    pub fn set_models(&self, models: Vec<Model>) {
        *self.models.borrow_mut() = models;
    }

    pub fn wake_ups(&self) -> Vec<NaiveDateTime> {
        self.wake_ups.borrow().clone()
    }

    pub fn last_wake_up(&self) -> Option<NaiveDateTime> {
        self.wake_ups.borrow().last().copied()
    }

    pub fn clear_wake_ups(&self) {
        self.wake_ups.borrow_mut().clear();
    }
}

impl ConditionContext for TestContext {
    fn local_time(&self) -> NaiveDateTime {
        self.now.get()
    }

    fn models(&self) -> Vec<Model> {
        self.models.borrow().clone()
    }

    fn wake_up_at(&self, timestamp: NaiveDateTime) {
        self.wake_ups.borrow_mut().push(timestamp);
    }
}

/// Simple trigger that fires on "power" value changes while armed,
/// exposing its armed flag for assertions
pub struct RecordingTrigger {
    armed: Arc<AtomicBool>,
}

impl RecordingTrigger {
    pub fn new(armed: Arc<AtomicBool>) -> Self {
        RecordingTrigger { armed }
    }
}

impl Condition for RecordingTrigger {
    fn is_satisfiable(&self, _ctx: &dyn ConditionContext) -> ConditionResult<bool> {
        Ok(true)
    }

    fn activate(&mut self, _ctx: &dyn ConditionContext) -> ConditionResult<()> {
        self.armed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn deactivate(&mut self, _ctx: &dyn ConditionContext) {
        self.armed.store(false, Ordering::SeqCst);
    }

    fn handles_event_of_type(&self, event_type: RuleEventType) -> bool {
        event_type == RuleEventType::ValueChanged
    }

    fn should_fire(
        &mut self,
        _ctx: &dyn ConditionContext,
        event: &RuleEvent,
    ) -> ConditionResult<bool> {
        if !self.armed.load(Ordering::SeqCst) {
            return Ok(false);
        }
        Ok(matches!(
            event,
            RuleEvent::ValueChanged { attribute, .. } if attribute == "power"
        ))
    }

    fn is_simple_trigger(&self) -> bool {
        true
    }
}
