//! `sk-core` — foundational types for the sim-kernel framework.
//!
//! This crate is a dependency of every other `sk-*` crate.  It intentionally
//! has no `sk-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`time`]        | `SimTime`, `TimeLapse`, `ClockConfig`                 |
//! | [`rng`]         | `SimRng` (scheduler-owned, seeded)                    |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to `SimTime`/`ClockConfig`. |

pub mod error;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use rng::SimRng;
pub use time::{ClockConfig, SimTime, TimeLapse};
