use sk_core::CoreError;
use sk_event::EventError;
use sk_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// Invalid clock configuration or a time budget violation.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Event(#[from] EventError),

    /// A participant callback failed; the tick was abandoned.
    #[error("participant failed: {0}")]
    Participant(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl SimError {
    /// Wrap a participant's own error (or message) as [`SimError::Participant`].
    pub fn participant(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        SimError::Participant(err.into())
    }
}

pub type SimResult<T> = Result<T, SimError>;
