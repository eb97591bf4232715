use sk_event::EventError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FsmError {
    #[error("no transition from state {state} on event {event}")]
    UnsupportedTransition { state: String, event: String },

    #[error("conflicting transitions from state {state} on event {event}")]
    ConflictingTransition { state: String, event: String },

    #[error("state transition notification failed: {0}")]
    Event(#[from] EventError),
}

pub type FsmResult<T> = Result<T, FsmError>;
