//! `sk-clock` — tick loop orchestrator for the sim-kernel framework.
//!
//! # Two-phase tick loop
//!
//! ```text
//! loop while ticking:
//!   ① Snapshot  — copy the participant list; changes requested during this
//!                 tick apply from the next one.
//!   ② Tick      — for each participant, in registration order:
//!                   lapse = [now, now + step), unconsumed
//!                   participant.tick(&mut lapse, &mut ctx)
//!   ③ After     — for each participant, same order:
//!                   lapse = [now, now + step), fully consumed
//!                   participant.after_tick(&mut lapse, &mut ctx)
//!   ④ Advance   — now += step
//!   ⑤ Apply     — registrations / unregistrations queued via the context,
//!                 in request order.
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use sk_clock::{SchedulerBuilder, TickListener};
//! use sk_core::ClockConfig;
//! use sk_model::{Roles, shared};
//!
//! let mut scheduler = SchedulerBuilder::new()
//!     .config(config)
//!     .model(Depot::default())
//!     .build()?;
//! scheduler.seal();
//! let courier = shared(Courier::new());
//! scheduler.register(Roles::new().with::<dyn TickListener>(courier.clone()))?;
//! scheduler.start()?;
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod event;
pub mod listener;
pub mod scheduler;


pub use builder::SchedulerBuilder;
pub use context::TickContext;
pub use error::{SimError, SimResult};
pub use event::{SimEvent, SimEventKind};
pub use listener::TickListener;
pub use scheduler::{Scheduler, StopHandle};
