//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as a `#[from]`
//! variant so budget violations raised inside participant code propagate with
//! `?`.

use thiserror::Error;

use crate::SimTime;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// `consume` was called with a zero amount.
    #[error("cannot consume a non-positive amount of time")]
    NonPositiveAmount,

    #[error("cannot consume {requested} time units, only {left} left")]
    InsufficientTime { requested: u64, left: u64 },

    #[error("cannot split {length} time units from a lapse with {left} left")]
    InvalidSplit { length: u64, left: u64 },

    #[error("time interval [{start}, {end}) is empty")]
    EmptyInterval { start: SimTime, end: SimTime },

    /// Advancing `time` by `step` would leave the representable range.
    #[error("advancing {time} by {step} overflows the clock")]
    TimeOverflow { time: SimTime, step: u64 },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `sk-core`.
pub type CoreResult<T> = Result<T, CoreError>;
