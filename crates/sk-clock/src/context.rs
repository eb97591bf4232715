//! `TickContext` — the scheduler facilities available inside a callback.

use sk_core::{SimRng, SimTime};
use sk_model::Roles;
use tracing::trace;

/// A registry change requested by a participant mid-tick.
pub(crate) enum PendingChange {
    Register(Roles),
    Unregister(Roles),
}

/// Handed to [`TickListener`][crate::TickListener] callbacks.
///
/// Requests made through the context are queued and applied, in request
/// order, once the whole tick (both phases) has completed and the clock has
/// advanced.
pub struct TickContext<'a> {
    now:     SimTime,
    step:    u64,
    rng:     &'a mut SimRng,
    pending: &'a mut Vec<PendingChange>,
    stop:    &'a mut bool,
}

impl<'a> TickContext<'a> {
    pub(crate) fn new(
        now:     SimTime,
        step:    u64,
        rng:     &'a mut SimRng,
        pending: &'a mut Vec<PendingChange>,
        stop:    &'a mut bool,
    ) -> Self {
        Self { now, step, rng, pending, stop }
    }

    /// Start of the tick being processed.
    #[inline]
    pub fn current_time(&self) -> SimTime {
        self.now
    }

    #[inline]
    pub fn time_step(&self) -> u64 {
        self.step
    }

    /// The scheduler's seeded RNG.
    #[inline]
    pub fn rng(&mut self) -> &mut SimRng {
        self.rng
    }

    /// Register an entity once this tick completes.
    pub fn register(&mut self, roles: Roles) {
        trace!(?roles, "registration deferred to end of tick");
        self.pending.push(PendingChange::Register(roles));
    }

    /// Unregister an entity once this tick completes.
    pub fn unregister(&mut self, roles: Roles) {
        trace!(?roles, "unregistration deferred to end of tick");
        self.pending.push(PendingChange::Unregister(roles));
    }

    /// Ask the running [`Scheduler::start`][crate::Scheduler::start] loop to
    /// end after this tick.  Has no effect on `tick`/`run_ticks` called
    /// directly.
    pub fn stop(&mut self) {
        *self.stop = true;
    }

    /// `true` once any callback in this tick has called [`stop`][Self::stop].
    pub fn stop_requested(&self) -> bool {
        *self.stop
    }
}
