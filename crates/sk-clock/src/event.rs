//! Scheduler lifecycle events.

use sk_core::SimTime;
use sk_event::Event;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum SimEventKind {
    /// The tick loop began.
    Started,
    /// The tick loop returned.
    Stopped,
}

/// Emitted by [`Scheduler::start`][crate::Scheduler::start].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct SimEvent {
    pub kind: SimEventKind,
    /// Clock reading when the event fired.
    pub time: SimTime,
}

impl Event for SimEvent {
    type Kind = SimEventKind;

    fn kind(&self) -> SimEventKind {
        self.kind
    }
}
