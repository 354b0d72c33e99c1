//! Filter conditions
//!
//! A filter wraps a delegate condition and gates whether the delegate's
//! firing is observed, by an orthogonal criterion supplied by a
//! [`FilterGate`] (a time window, a day set, an attribute predicate). The
//! filter itself is a two-state machine: while `Active` the delegate is armed
//! and may fire, while `Inactive` the delegate is disarmed and silent.

use hearth_core::{RuleEvent, RuleEventType};
use tracing::trace;

use crate::condition::{Condition, ConditionResult};
use crate::context::ConditionContext;
use crate::state::{StateMachine, StatefulCondition, Transition};

/// The two states of a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterState {
    /// The delegate is disarmed; its firing is not observed
    Inactive,

    /// The delegate is armed and may fire
    Active,
}

/// The gating criterion of a filter
///
/// `matches` probes the criterion for the initial state; `update` re-derives
/// it from an event the gate declared interest in. Both may fail, and the
/// failure propagates to the dispatcher (fail-closed).
pub trait FilterGate: Send {
    /// Event types that re-evaluate the gate
    fn transitions_on(&self, event_type: RuleEventType) -> bool;

    /// Whether the gate is currently open, from the context alone
    fn matches(&self, ctx: &dyn ConditionContext) -> ConditionResult<bool>;

    /// Whether the gate is open, re-derived from `event`
    fn update(&mut self, ctx: &dyn ConditionContext, event: &RuleEvent)
        -> ConditionResult<bool>;

    /// Whether the gate could ever open against the current context
    fn is_satisfiable(&self, _ctx: &dyn ConditionContext) -> ConditionResult<bool> {
        Ok(true)
    }

    /// Hook run when the filter enters `Active`
    fn on_activated(&mut self, _ctx: &dyn ConditionContext) {}

    /// Hook run when the filter enters `Inactive`
    fn on_deactivated(&mut self, _ctx: &dyn ConditionContext) {}
}

/// State machine gating a delegate condition by a [`FilterGate`]
pub struct FilterMachine {
    gate: Box<dyn FilterGate>,
    delegate: Box<dyn Condition>,
}

/// A filter condition ready for event delivery
pub type Filter = StatefulCondition<FilterMachine>;

impl FilterMachine {
    /// Create a machine around `gate` and `delegate`
    pub fn new(gate: Box<dyn FilterGate>, delegate: Box<dyn Condition>) -> Self {
        FilterMachine { gate, delegate }
    }

    /// Create the filter condition directly
    pub fn condition(gate: Box<dyn FilterGate>, delegate: Box<dyn Condition>) -> Filter {
        StatefulCondition::new(FilterMachine::new(gate, delegate))
    }

    /// Forward the event to the delegate if it observes this event type
    fn delegate_fire(
        &mut self,
        ctx: &dyn ConditionContext,
        event: &RuleEvent,
    ) -> ConditionResult<bool> {
        if self.delegate.handles_event_of_type(event.event_type()) {
            self.delegate.should_fire(ctx, event)
        } else {
            Ok(false)
        }
    }
}

impl StateMachine for FilterMachine {
    type State = FilterState;

    fn initial_state(&mut self, ctx: &dyn ConditionContext) -> ConditionResult<FilterState> {
        Ok(if self.gate.matches(ctx)? {
            FilterState::Active
        } else {
            FilterState::Inactive
        })
    }

    fn handles(&self, _state: &FilterState, event_type: RuleEventType) -> bool {
        self.gate.transitions_on(event_type) || self.delegate.handles_event_of_type(event_type)
    }

    fn transition(
        &mut self,
        state: FilterState,
        ctx: &dyn ConditionContext,
        event: &RuleEvent,
    ) -> ConditionResult<Transition<FilterState>> {
        let event_type = event.event_type();
        let interested = self.gate.transitions_on(event_type);

        match state {
            FilterState::Inactive => {
                if !interested {
                    // Delegate-only event while the gate is closed.
                    return Ok(Transition::to(FilterState::Inactive));
                }
                if !self.gate.update(ctx, event)? {
                    return Ok(Transition::to(FilterState::Inactive));
                }

                // The gate just opened. A simple trigger must already be
                // armed to evaluate the very event that opened the gate;
                // stateful delegates are armed by the Active enter hook and
                // begin observing from the next event.
                if self.delegate.is_simple_trigger() {
                    self.delegate.activate(ctx)?;
                }
                let fired = self.delegate_fire(ctx, event)?;
                Ok(Transition::firing(FilterState::Active, fired))
            }
            FilterState::Active => {
                if interested && !self.gate.update(ctx, event)? {
                    trace!("gate closed, deactivating delegate");
                    return Ok(Transition::to(FilterState::Inactive));
                }
                let fired = self.delegate_fire(ctx, event)?;
                Ok(Transition::firing(FilterState::Active, fired))
            }
        }
    }

    fn on_enter(
        &mut self,
        state: &FilterState,
        ctx: &dyn ConditionContext,
    ) -> ConditionResult<()> {
        match state {
            FilterState::Active => {
                self.delegate.activate(ctx)?;
                self.gate.on_activated(ctx);
            }
            FilterState::Inactive => {
                self.delegate.deactivate(ctx);
                self.gate.on_deactivated(ctx);
            }
        }
        Ok(())
    }

    fn on_exit(&mut self, state: &FilterState, ctx: &dyn ConditionContext) {
        // Ensures the delegate is disarmed when the whole filter is torn
        // down while Active; re-disarming on Active -> Inactive is harmless.
        if *state == FilterState::Active {
            self.delegate.deactivate(ctx);
        }
    }

    fn is_satisfiable(&self, ctx: &dyn ConditionContext) -> ConditionResult<bool> {
        // A filter with an impossible delegate is itself impossible,
        // regardless of its own gate.
        Ok(self.gate.is_satisfiable(ctx)? && self.delegate.is_satisfiable(ctx)?)
    }
}
