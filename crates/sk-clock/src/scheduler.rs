//! The `Scheduler` struct and its tick loop.

use std::cell::Cell;
use std::rc::Rc;

use sk_core::{ClockConfig, CoreError, SimRng, SimTime, TimeLapse};
use sk_event::{EventApi, EventDispatcher};
use sk_model::{Model, ModelRegistry, Roles, Shared};
use tracing::{debug, info, trace};

use crate::context::PendingChange;
use crate::{SimEvent, SimEventKind, SimResult, TickContext, TickListener};

/// Shared stop flag for a [`Scheduler`].
///
/// Clones share one flag.  The scheduler checks it between ticks of
/// [`Scheduler::start`] and clears it when the run ends.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.set(true);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.get()
    }

    fn clear(&self) {
        self.0.set(false);
    }
}

/// Address of a participant allocation, used as its identity.
fn participant_key(p: &Shared<dyn TickListener>) -> usize {
    Rc::as_ptr(p) as *const () as usize
}

/// The discrete-time simulation clock.
///
/// `Scheduler` owns the logical clock, the model registry, the ordered list
/// of tick participants, one reusable [`TimeLapse`], the seeded RNG and the
/// lifecycle event dispatcher.
///
/// # Phases
///
/// 1. **Configuration**: models are added ([`register_model`][Self::register_model]).
/// 2. **Sealed**: after [`seal`][Self::seal] (or the first tick) only
///    entities can be registered.
///
/// Create via [`SchedulerBuilder`][crate::SchedulerBuilder].
pub struct Scheduler {
    config:       ClockConfig,
    time:         SimTime,
    /// Flyweight budget, re-initialized before every callback.
    lapse:        TimeLapse,
    rng:          SimRng,
    models:       ModelRegistry,
    /// Tick participants in registration order.
    participants: Vec<Shared<dyn TickListener>>,
    events:       EventDispatcher<SimEvent>,
    stop:         StopHandle,
    ticking:      bool,
    ticks:        u64,
}

impl Scheduler {
    pub(crate) fn from_parts(config: ClockConfig, models: ModelRegistry) -> SimResult<Self> {
        config.validate()?;
        let start = config.start_time;
        Ok(Self {
            time:         start,
            lapse:        TimeLapse::new(start, start + config.time_step)?,
            rng:          SimRng::new(config.seed),
            models,
            participants: Vec::new(),
            events:       EventDispatcher::new([SimEventKind::Started, SimEventKind::Stopped])?,
            stop:         StopHandle::default(),
            ticking:      false,
            ticks:        0,
            config,
        })
    }

    // ── Registration ──────────────────────────────────────────────────────

    /// Add a model.  Fails once the scheduler is sealed.
    pub fn register_model<M: Model>(&mut self, model: M) -> SimResult<Shared<M>> {
        Ok(self.models.add_model(model)?)
    }

    /// Add a model the caller already holds a handle to.
    pub fn register_shared_model<M: Model>(&mut self, model: Shared<M>) -> SimResult<()> {
        Ok(self.models.add_shared_model(model)?)
    }

    /// End the configuration phase.  Idempotent; also done implicitly by
    /// [`tick`][Self::tick] and [`start`][Self::start].
    pub fn seal(&mut self) {
        self.models.seal();
    }

    pub fn is_sealed(&self) -> bool {
        self.models.is_sealed()
    }

    /// Register an entity.
    ///
    /// The entity is offered to every model handling one of its roles.  If it
    /// plays `dyn TickListener` it is also appended to the participant list
    /// (once; re-registering the same handle does not duplicate it).
    ///
    /// Returns `Ok(true)` if any model accepted it or it became a participant.
    /// Fails if the scheduler is not sealed yet or `roles` is empty.
    pub fn register(&mut self, roles: Roles) -> SimResult<bool> {
        let mut accepted = self.models.register_entity(&roles)?;
        if let Some(participant) = roles.get::<dyn TickListener>() {
            let key = participant_key(&participant);
            if !self.participants.iter().any(|p| participant_key(p) == key) {
                self.participants.push(participant);
                debug!(participants = self.participants.len(), "tick participant added");
            }
            accepted = true;
        }
        Ok(accepted)
    }

    /// Unregister an entity from its models and the participant list.
    ///
    /// Returns `Ok(true)` if anything released it.
    pub fn unregister(&mut self, roles: &Roles) -> SimResult<bool> {
        let mut released = self.models.unregister_entity(roles)?;
        if let Some(participant) = roles.get::<dyn TickListener>() {
            let key = participant_key(&participant);
            let before = self.participants.len();
            self.participants.retain(|p| participant_key(p) != key);
            if self.participants.len() < before {
                debug!(participants = self.participants.len(), "tick participant removed");
                released = true;
            }
        }
        Ok(released)
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Run ticks until stopped (or until `end_time`, if configured).
    ///
    /// Emits [`SimEventKind::Started`] when the loop begins and
    /// [`SimEventKind::Stopped`] when it ends normally.  A participant error
    /// ends the loop immediately and is returned without a `Stopped` event.
    ///
    /// Stop requests (from [`stop`][Self::stop], a [`StopHandle`] or
    /// [`TickContext::stop`]) are checked between ticks and cleared when the
    /// run ends.  A request made before the call ends the run before its
    /// first tick.
    pub fn start(&mut self) -> SimResult<()> {
        self.seal();
        self.ticking = true;
        info!(time = %self.time, step = self.config.time_step, "simulation started");
        self.events.dispatch(&SimEvent { kind: SimEventKind::Started, time: self.time })?;

        while !self.stop.is_stop_requested() && !self.reached_end() {
            if let Err(err) = self.tick() {
                self.ticking = false;
                self.stop.clear();
                return Err(err);
            }
        }

        self.ticking = false;
        self.stop.clear();
        info!(time = %self.time, ticks = self.ticks, "simulation stopped");
        self.events.dispatch(&SimEvent { kind: SimEventKind::Stopped, time: self.time })?;
        Ok(())
    }

    /// Request the running (or next) [`start`][Self::start] loop to end.  The
    /// tick in progress, if any, completes.
    pub fn stop(&self) {
        self.stop.stop();
    }

    /// A handle that stops this scheduler from outside the tick loop, e.g.
    /// from a lifecycle listener or a timeout owned by the application.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Run exactly `n` ticks from the current time (ignores `end_time`, emits
    /// no lifecycle events).  Useful for tests and incremental stepping.
    pub fn run_ticks(&mut self, n: u64) -> SimResult<()> {
        for _ in 0..n {
            self.tick()?;
        }
        Ok(())
    }

    /// Advance the clock by one step, notifying every participant.
    pub fn tick(&mut self) -> SimResult<()> {
        self.seal();

        // Participants added or removed during this tick take effect next tick.
        let snapshot: Vec<Shared<dyn TickListener>> = self.participants.clone();
        let now = self.time;
        let step = self.config.time_step;
        let end = now
            .checked_offset(step)
            .ok_or(CoreError::TimeOverflow { time: now, step })?;

        let mut pending: Vec<PendingChange> = Vec::new();
        let mut stop = false;
        {
            // Explicit field borrows so the borrow checker sees disjoint access.
            let lapse = &mut self.lapse;
            let mut ctx = TickContext::new(now, step, &mut self.rng, &mut pending, &mut stop);

            for participant in &snapshot {
                lapse.reinit(now, end)?;
                participant.borrow_mut().tick(lapse, &mut ctx)?;
            }
            for participant in &snapshot {
                lapse.reinit_exhausted(now, end)?;
                participant.borrow_mut().after_tick(lapse, &mut ctx)?;
            }
        }

        self.time = end;
        self.ticks += 1;
        trace!(time = %self.time, participants = snapshot.len(), "tick complete");

        for change in pending {
            match change {
                PendingChange::Register(roles) => {
                    self.register(roles)?;
                }
                PendingChange::Unregister(roles) => {
                    self.unregister(&roles)?;
                }
            }
        }

        // Outside `start` there is no loop to end.
        if stop && self.ticking {
            debug!(time = %self.time, "stop requested by participant");
            self.stop.stop();
        }
        Ok(())
    }

    fn reached_end(&self) -> bool {
        self.config.end_time.is_some_and(|end| self.time >= end)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// Start of the next tick to run.
    pub fn current_time(&self) -> SimTime {
        self.time
    }

    pub fn time_step(&self) -> u64 {
        self.config.time_step
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    /// Number of completed ticks.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    /// The registered model of type `M`, if any.
    pub fn model<M: Model>(&self) -> Option<Shared<M>> {
        self.models.model::<M>()
    }

    /// Subscribe here for [`SimEvent`]s.
    pub fn event_api(&self) -> EventApi<SimEvent> {
        self.events.api()
    }

    /// The scheduler's seeded RNG, for setup code outside the tick loop.
    pub fn rng(&mut self) -> &mut SimRng {
        &mut self.rng
    }
}
