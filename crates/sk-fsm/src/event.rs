//! Notifications emitted by a state machine.

use sk_event::Event;

use crate::Trigger;

/// Event kinds a [`StateMachine`][crate::StateMachine] dispatcher supports.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum StateMachineEventKind {
    StateTransition,
}

/// Emitted after a transition has completed (exit and entry hooks run).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateTransitionEvent<S, E> {
    pub previous: S,
    pub trigger:  E,
    pub next:     S,
}

impl<S, E> StateTransitionEvent<S, E> {
    /// `true` if this transition went from `from` to `to` on `trigger`.
    pub fn is(&self, from: S, trigger: E, to: S) -> bool
    where
        S: PartialEq,
        E: PartialEq,
    {
        self.previous == from && self.trigger == trigger && self.next == to
    }
}

impl<S: Copy + 'static, E: Trigger> Event for StateTransitionEvent<S, E> {
    type Kind = StateMachineEventKind;

    fn kind(&self) -> StateMachineEventKind {
        StateMachineEventKind::StateTransition
    }
}
