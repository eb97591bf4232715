use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("cannot add model {0}: the model registry is sealed")]
    Sealed(&'static str),

    #[error("cannot register entities before the model registry is sealed")]
    NotSealed,

    #[error("a model of type {0} is already registered")]
    DuplicateModel(&'static str),

    #[error("entity declares no roles")]
    NoRoles,

    #[error("model {model} failed: {reason}")]
    Callback { model: &'static str, reason: String },
}

impl ModelError {
    /// Build a [`ModelError::Callback`] naming the model type `M`.
    pub fn callback<M: ?Sized>(reason: impl Into<String>) -> Self {
        ModelError::Callback {
            model:  std::any::type_name::<M>(),
            reason: reason.into(),
        }
    }
}

pub type ModelResult<T> = Result<T, ModelError>;
