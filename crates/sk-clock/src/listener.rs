//! The `TickListener` trait — per-step callbacks for participants.

use sk_core::TimeLapse;

use crate::{SimResult, TickContext};

/// A participant in the tick loop.
///
/// Register by declaring the role when registering the entity:
///
/// ```rust,ignore
/// scheduler.register(Roles::new().with::<dyn TickListener>(agent.clone()))?;
/// ```
///
/// The `lapse` argument is lent for the duration of the call only.  It is
/// re-initialized before every callback, so one participant's spending never
/// affects another's budget.
///
/// Returning `Err` abandons the tick: the clock does not advance and the
/// error surfaces from `Scheduler::tick` / `Scheduler::start`.
pub trait TickListener: 'static {
    /// Spend (part of) this tick's time budget.
    fn tick(&mut self, lapse: &mut TimeLapse, ctx: &mut TickContext<'_>) -> SimResult<()>;

    /// Called after every participant has ticked.  `lapse` covers the same
    /// interval but arrives fully consumed, so any `consume` fails.
    fn after_tick(&mut self, _lapse: &mut TimeLapse, _ctx: &mut TickContext<'_>) -> SimResult<()> {
        Ok(())
    }
}
