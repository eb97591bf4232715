//! Courier agents: tick participants whose behavior is a three-state FSM.

use sk_clock::{SimError, SimResult, TickContext, TickListener};
use sk_core::TimeLapse;
use sk_fsm::{FsmResult, State, StateMachine};

/// What the depot needs to know about anything that carries parcels.
pub trait Carrier {
    fn id(&self) -> u32;
    fn delivered(&self) -> u32;
    fn distance_driven(&self) -> u64;
}

// ── Behavior states ───────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Leg {
    Idle,
    Driving,
    Unloading,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Signal {
    Dispatch,
    Arrive,
    Unloaded,
}

/// Mutable trip bookkeeping shared by the courier and its state hooks.
#[derive(Default)]
pub struct Trip {
    pub drop_off_time: u64,
    pub drive_left:    u64,
    pub unload_left:   u64,
    pub delivered:     u32,
    pub driven:        u64,
}

impl State<Signal, Trip> for Leg {
    fn on_entry(&self, _event: Signal, trip: &mut Trip) {
        match self {
            Leg::Unloading => trip.unload_left = trip.drop_off_time,
            Leg::Idle => trip.delivered += 1,
            Leg::Driving => {}
        }
    }

    fn handle(&self, _event: Option<Signal>, trip: &mut Trip) -> Option<Signal> {
        // Parcels that need no unloading time are handed over on arrival.
        match self {
            Leg::Unloading if trip.unload_left == 0 => Some(Signal::Unloaded),
            _ => None,
        }
    }
}

pub fn behavior() -> FsmResult<StateMachine<Leg, Signal, Trip>> {
    StateMachine::builder(Leg::Idle)
        .add_transition(Leg::Idle, Signal::Dispatch, Leg::Driving)
        .add_transition(Leg::Driving, Signal::Arrive, Leg::Unloading)
        .add_transition(Leg::Unloading, Signal::Unloaded, Leg::Idle)
        .build()
}

// ── Courier ───────────────────────────────────────────────────────────────────

pub struct Courier {
    id:      u32,
    max_leg: u64,
    pub fsm: StateMachine<Leg, Signal, Trip>,
    trip:    Trip,
}

impl Courier {
    pub fn new(id: u32, max_leg: u64, drop_off_time: u64) -> FsmResult<Self> {
        Ok(Self {
            id,
            max_leg,
            fsm: behavior()?,
            trip: Trip { drop_off_time, ..Trip::default() },
        })
    }

    fn signal(&mut self, signal: Signal) -> SimResult<()> {
        self.fsm
            .handle(Some(signal), &mut self.trip)
            .map_err(SimError::participant)
    }
}

impl TickListener for Courier {
    fn tick(&mut self, lapse: &mut TimeLapse, ctx: &mut TickContext<'_>) -> SimResult<()> {
        while lapse.has_time_left() {
            match self.fsm.current_state() {
                Leg::Idle => {
                    self.trip.drive_left = ctx.rng().gen_range(1..=self.max_leg);
                    self.signal(Signal::Dispatch)?;
                }
                Leg::Driving => {
                    let spend = self.trip.drive_left.min(lapse.time_left());
                    lapse.consume(spend)?;
                    self.trip.drive_left -= spend;
                    self.trip.driven += spend;
                    if self.trip.drive_left == 0 {
                        self.signal(Signal::Arrive)?;
                    }
                }
                Leg::Unloading => {
                    let spend = self.trip.unload_left.min(lapse.time_left());
                    lapse.consume(spend)?;
                    self.trip.unload_left -= spend;
                    if self.trip.unload_left == 0 {
                        self.signal(Signal::Unloaded)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl Carrier for Courier {
    fn id(&self) -> u32 {
        self.id
    }

    fn delivered(&self) -> u32 {
        self.trip.delivered
    }

    fn distance_driven(&self) -> u64 {
        self.trip.driven
    }
}
