//! `StateMachine` and its builder.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::marker::PhantomData;

use sk_event::{EventApi, EventDispatcher};
use tracing::{debug, trace};

use crate::{FsmError, FsmResult, State, StateMachineEventKind, StateTransitionEvent, Trigger};

type Table<S, E> = HashMap<(S, E), S>;

// ── Builder ───────────────────────────────────────────────────────────────────

/// Fluent builder for [`StateMachine`].
///
/// ```rust,ignore
/// let fsm = StateMachine::builder(Light::Off)
///     .add_transition(Light::Off, Switch::Flip, Light::On)
///     .add_transition(Light::On, Switch::Flip, Light::Off)
///     .build()?;
/// ```
pub struct StateMachineBuilder<S, E, C>
where
    S: State<E, C>,
    E: Trigger,
{
    start:              S,
    table:              Table<S, E>,
    conflicts:          Vec<(S, E)>,
    explicit_recursive: bool,
    _context:           PhantomData<fn(&mut C)>,
}

impl<S, E, C> StateMachineBuilder<S, E, C>
where
    S: State<E, C>,
    E: Trigger,
{
    /// Start a table whose machine begins in `start`.
    pub fn new(start: S) -> Self {
        Self {
            start,
            table:              HashMap::new(),
            conflicts:          Vec::new(),
            explicit_recursive: false,
            _context:           PhantomData,
        }
    }

    /// Declare that `event` moves the machine from `from` to `to`.
    ///
    /// Repeating an identical transition is harmless; declaring a second,
    /// different target for the same `(from, event)` makes `build` fail.
    pub fn add_transition(mut self, from: S, event: E, to: S) -> Self {
        if let Some(existing) = self.table.insert((from, event), to) {
            if existing != to {
                self.conflicts.push((from, event));
            }
        }
        self
    }

    /// Treat transitions whose target equals the current state as real
    /// transitions: exit and entry hooks run and an event is emitted.
    pub fn explicit_recursive_transitions(mut self) -> Self {
        self.explicit_recursive = true;
        self
    }

    /// Freeze the table.
    pub fn build(self) -> FsmResult<StateMachine<S, E, C>> {
        if let Some((state, event)) = self.conflicts.first() {
            return Err(FsmError::ConflictingTransition {
                state: format!("{state:?}"),
                event: format!("{event:?}"),
            });
        }
        let events = EventDispatcher::new([StateMachineEventKind::StateTransition])?;
        Ok(StateMachine {
            start:              self.start,
            current:            self.start,
            table:              self.table,
            explicit_recursive: self.explicit_recursive,
            transitions:        0,
            events,
            _context:           PhantomData,
        })
    }
}

// ── StateMachine ──────────────────────────────────────────────────────────────

/// A finite state machine driven by an immutable `(state, event) → state`
/// table.
///
/// The machine does not own its context; callers pass `&mut C` to
/// [`handle`][Self::handle] so one context type can be shared by the machine
/// and the entity that embeds it.
pub struct StateMachine<S, E, C>
where
    S: State<E, C>,
    E: Trigger,
{
    start:              S,
    current:            S,
    table:              Table<S, E>,
    explicit_recursive: bool,
    transitions:        u64,
    events:             EventDispatcher<StateTransitionEvent<S, E>>,
    _context:           PhantomData<fn(&mut C)>,
}

impl<S, E, C> StateMachine<S, E, C>
where
    S: State<E, C>,
    E: Trigger,
{
    pub fn builder(start: S) -> StateMachineBuilder<S, E, C> {
        StateMachineBuilder::new(start)
    }

    /// Process `event` (if any), then let the resulting state react.
    ///
    /// With `Some(event)`, the machine looks up `(current, event)`; a missing
    /// entry is an error and leaves the state unchanged.  If the target
    /// differs from the current state, the old state's `on_exit`, the switch,
    /// the new state's `on_entry` and a [`StateTransitionEvent`] follow, in
    /// that order.  The (possibly new) current state's `handle` hook then
    /// runs; any trigger it returns is processed the same way, until a state
    /// returns `None`.
    pub fn handle(&mut self, event: Option<E>, context: &mut C) -> FsmResult<()> {
        let mut next = event;
        loop {
            if let Some(trigger) = next {
                self.transition(trigger, context)?;
            }
            next = self.current.handle(next, context);
            if next.is_none() {
                return Ok(());
            }
            trace!(state = ?self.current, trigger = ?next, "state chained follow-up event");
        }
    }

    fn transition(&mut self, event: E, context: &mut C) -> FsmResult<()> {
        let from = self.current;
        let Some(&to) = self.table.get(&(from, event)) else {
            return Err(FsmError::UnsupportedTransition {
                state: format!("{from:?}"),
                event: format!("{event:?}"),
            });
        };
        if to == from && !self.explicit_recursive {
            return Ok(());
        }

        from.on_exit(event, context);
        self.current = to;
        to.on_entry(event, context);
        self.transitions += 1;
        debug!(?from, ?event, ?to, "state transition");

        self.events.dispatch(&StateTransitionEvent {
            previous: from,
            trigger:  event,
            next:     to,
        })?;
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn current_state(&self) -> S {
        self.current
    }

    pub fn start_state(&self) -> S {
        self.start
    }

    #[inline]
    pub fn state_is(&self, state: S) -> bool {
        self.current == state
    }

    pub fn state_is_one_of(&self, states: &[S]) -> bool {
        states.contains(&self.current)
    }

    /// `true` if `event` has a transition from the current state.
    pub fn is_supported(&self, event: E) -> bool {
        self.table.contains_key(&(self.current, event))
    }

    /// Number of transitions performed so far (skipped self-transitions
    /// excluded).
    pub fn transition_count(&self) -> u64 {
        self.transitions
    }

    /// Subscribe here to observe [`StateTransitionEvent`]s.
    pub fn event_api(&self) -> EventApi<StateTransitionEvent<S, E>> {
        self.events.api()
    }

    /// Render the transition table as a Graphviz digraph.  Edges are sorted
    /// so the output is stable across runs.
    pub fn to_dot(&self) -> String {
        let mut edges: Vec<(String, String, String)> = self
            .table
            .iter()
            .map(|((from, event), to)| {
                (format!("{from:?}"), format!("{event:?}"), format!("{to:?}"))
            })
            .collect();
        edges.sort();

        let mut out = String::from("digraph stategraph {\n");
        let _ = writeln!(out, "    \"{:?}\" [peripheries=2];", self.start);
        for (from, event, to) in &edges {
            let _ = writeln!(out, "    \"{from}\" -> \"{to}\" [label=\"{event}\"];");
        }
        out.push_str("}\n");
        out
    }
}
