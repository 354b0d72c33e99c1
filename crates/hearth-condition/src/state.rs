//! State-machine driver for conditions
//!
//! `StatefulCondition` holds the current state for a condition kind described
//! by a [`StateMachine`], feeds it events, and exposes firing status. States
//! are plain values (a closed tagged union per condition kind); transitions
//! are explicit and exhaustively checkable.

use std::fmt;

use hearth_core::{RuleEvent, RuleEventType};
use tracing::trace;

use crate::condition::{Condition, ConditionResult};
use crate::context::ConditionContext;

/// Outcome of feeding one event to a state machine
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<S> {
    /// The state to occupy after the event (possibly unchanged)
    pub next: S,

    /// Whether this transition fires the rule
    pub fired: bool,
}

impl<S> Transition<S> {
    /// Stay in (or move to) `next` without firing
    pub fn to(next: S) -> Self {
        Transition { next, fired: false }
    }

    /// Move to `next`, firing if `fired`
    pub fn firing(next: S, fired: bool) -> Self {
        Transition { next, fired }
    }
}

/// The transition table of one condition kind
///
/// The driver owns the machine and its current state; the machine owns
/// whatever the condition kind needs (a delegate, a window, a matcher).
/// Value-carrying states compare by value, so a transition to a state of the
/// same kind with different tracked values still runs the enter/exit hooks.
pub trait StateMachine: Send {
    type State: Clone + PartialEq + fmt::Debug + Send;

    /// The state to start in, evaluated against the current context
    fn initial_state(&mut self, ctx: &dyn ConditionContext) -> ConditionResult<Self::State>;

    /// Whether `state` observes events of this type
    fn handles(&self, state: &Self::State, event_type: RuleEventType) -> bool;

    /// Consume one event from `state`, producing the next state and firing flag
    fn transition(
        &mut self,
        state: Self::State,
        ctx: &dyn ConditionContext,
        event: &RuleEvent,
    ) -> ConditionResult<Transition<Self::State>>;

    /// Hook run when a state is entered (including the initial state)
    fn on_enter(
        &mut self,
        _state: &Self::State,
        _ctx: &dyn ConditionContext,
    ) -> ConditionResult<()> {
        Ok(())
    }

    /// Hook run when a state is exited
    fn on_exit(&mut self, _state: &Self::State, _ctx: &dyn ConditionContext) {}

    /// Whether this machine could ever fire against the current context
    fn is_satisfiable(&self, _ctx: &dyn ConditionContext) -> ConditionResult<bool> {
        Ok(true)
    }
}

/// Generic state-machine condition driver
///
/// Holds no state until armed. Arming (an explicit [`Condition::activate`]
/// call, or lazily the first delivered event) computes the initial state and
/// enters it without firing; only a transition driven by a subsequent event
/// may set the firing flag.
pub struct StatefulCondition<M: StateMachine> {
    machine: M,
    state: Option<M::State>,
    firing: bool,
}

impl<M: StateMachine> StatefulCondition<M> {
    /// Create an unarmed condition around `machine`
    pub fn new(machine: M) -> Self {
        StatefulCondition {
            machine,
            state: None,
            firing: false,
        }
    }

    /// Whether the last delivered event left the condition firing
    pub fn is_firing(&self) -> bool {
        self.firing
    }

    /// The current state, if armed
    pub fn state(&self) -> Option<&M::State> {
        self.state.as_ref()
    }

    /// The underlying machine
    pub fn machine(&self) -> &M {
        &self.machine
    }

    /// Deliver one event; returns whether the condition is now firing
    ///
    /// The first event arms the machine and never fires. Events the current
    /// state does not observe are ignored and clear the firing flag.
    pub fn on_event(
        &mut self,
        ctx: &dyn ConditionContext,
        event: &RuleEvent,
    ) -> ConditionResult<bool> {
        self.firing = false;

        let current = match self.state.take() {
            Some(state) => state,
            None => {
                self.arm(ctx)?;
                return Ok(false);
            }
        };

        if !self.machine.handles(&current, event.event_type()) {
            trace!(event_type = ?event.event_type(), state = ?current, "event not handled, ignoring");
            self.state = Some(current);
            return Ok(false);
        }

        let previous = current.clone();
        let Transition { next, fired } = self.machine.transition(current, ctx, event)?;

        if next != previous {
            trace!(from = ?previous, to = ?next, fired, "state transition");
            self.machine.on_exit(&previous, ctx);
            self.machine.on_enter(&next, ctx)?;
        }

        self.state = Some(next);
        self.firing = fired;
        Ok(fired)
    }

    fn arm(&mut self, ctx: &dyn ConditionContext) -> ConditionResult<()> {
        let initial = self.machine.initial_state(ctx)?;
        trace!(state = ?initial, "entering initial state");
        self.machine.on_enter(&initial, ctx)?;
        self.state = Some(initial);
        Ok(())
    }
}

impl<M: StateMachine> Condition for StatefulCondition<M> {
    fn is_satisfiable(&self, ctx: &dyn ConditionContext) -> ConditionResult<bool> {
        self.machine.is_satisfiable(ctx)
    }

    fn activate(&mut self, ctx: &dyn ConditionContext) -> ConditionResult<()> {
        self.firing = false;
        if let Some(old) = self.state.take() {
            self.machine.on_exit(&old, ctx);
        }
        self.arm(ctx)
    }

    fn deactivate(&mut self, ctx: &dyn ConditionContext) {
        self.firing = false;
        if let Some(state) = self.state.take() {
            self.machine.on_exit(&state, ctx);
        }
    }

    fn handles_event_of_type(&self, event_type: RuleEventType) -> bool {
        // Unarmed conditions observe nothing; filters arm their delegates on
        // state entry before forwarding events to them.
        self.state
            .as_ref()
            .map(|state| self.machine.handles(state, event_type))
            .unwrap_or(false)
    }

    fn should_fire(
        &mut self,
        ctx: &dyn ConditionContext,
        event: &RuleEvent,
    ) -> ConditionResult<bool> {
        self.on_event(ctx, event)
    }
}
