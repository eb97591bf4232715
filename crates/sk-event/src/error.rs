use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("an event dispatcher needs at least one supported event kind")]
    NoSupportedKinds,

    #[error("event kind {0} is not supported by this dispatcher")]
    UnsupportedKind(String),

    #[error("listener is not registered for event kind {0}")]
    NotRegistered(String),
}

pub type EventResult<T> = Result<T, EventError>;
