//! `sk-fsm` — explicit behavioral states for simulation entities.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`state`]   | `State` trait (entry/exit/handle hooks)                      |
//! | [`machine`] | `StateMachine`, `StateMachineBuilder`                        |
//! | [`event`]   | `StateTransitionEvent`, `StateMachineEventKind`              |
//! | [`error`]   | `FsmError`, `FsmResult<T>`                                   |
//!
//! # Design notes
//!
//! States and triggers are small `Copy` enums compared by value.  All mutable
//! data lives in the caller-supplied context `C`, which every hook receives
//! as `&mut C`.  The transition table is frozen by
//! [`StateMachineBuilder::build`]; nothing at runtime can change it.
//!
//! A state's [`handle`][State::handle] hook may return a follow-up trigger.
//! The machine feeds it back in a loop until a state returns `None`, so long
//! chains never grow the call stack.

pub mod error;
pub mod event;
pub mod machine;
pub mod state;


pub use error::{FsmError, FsmResult};
pub use event::{StateMachineEventKind, StateTransitionEvent};
pub use machine::{StateMachine, StateMachineBuilder};
pub use state::{State, Trigger};
