//! `sk-event` — typed publish/subscribe bus.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`event`]      | `Event` trait (kind accessor), `Listener` trait            |
//! | [`dispatcher`] | `EventDispatcher` (dispatch side), `EventApi` (subscribe)  |
//! | [`error`]      | `EventError`, `EventResult<T>`                             |
//!
//! # Reentrancy
//!
//! Listeners run synchronously inside [`EventDispatcher::dispatch`] and may
//! call back into the same dispatcher: subscribe, unsubscribe, or dispatch a
//! follow-up event.  Every dispatch iterates a snapshot of the listeners
//! registered for the event's kind when it began.  Subscription changes made
//! while any dispatch is running are queued and applied, in request order,
//! once the outermost dispatch returns.
//!
//! # Cargo features
//!
//! | Feature   | Effect                                               |
//! |-----------|------------------------------------------------------|
//! | `fx-hash` | Uses `rustc-hash` for the per-kind listener index.   |

pub mod dispatcher;
pub mod error;
pub mod event;

#[cfg(test)]
mod tests;

pub use dispatcher::{EventApi, EventDispatcher};
pub use error::{EventError, EventResult};
pub use event::{Event, Listener, ListenerRef};
