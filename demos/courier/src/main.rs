//! courier — smallest end-to-end example for the sim-kernel framework.
//!
//! A depot model manages a fleet of couriers.  Each courier is a tick
//! participant that spends its time budget driving and unloading, with its
//! behavior expressed as a state machine.
//!
//! Usage: `courier [config.json]`.  Without a file the defaults below apply.
//! Log verbosity follows `RUST_LOG` (default `info`).

mod courier;
mod depot;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::info;

use sk_clock::{SchedulerBuilder, SimEvent, SimEventKind, TickListener};
use sk_core::{ClockConfig, SimTime};
use sk_event::{EventApi, ListenerRef};
use sk_fsm::{StateMachineEventKind, StateTransitionEvent};
use sk_model::{Roles, shared};

use courier::{Carrier, Courier, Leg, Signal};
use depot::Depot;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Demo configuration, optionally read from a JSON file.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct DemoConfig {
    clock:         ClockConfig,
    couriers:      u32,
    /// Longest drive per delivery, in time units.
    max_leg:       u64,
    /// Unloading time per delivery, in time units.
    drop_off_time: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            clock: ClockConfig {
                start_time: SimTime::ZERO,
                time_step:  60,          // 1 tick = 1 minute
                end_time:   Some(SimTime(8 * 3_600)),
                seed:       42,
            },
            couriers:      8,
            max_leg:       1_800,
            drop_off_time: 120,
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<DemoConfig> {
    let config = match path {
        None => DemoConfig::default(),
        Some(p) => {
            let file = File::open(p).with_context(|| format!("opening {}", p.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("parsing {}", p.display()))?
        }
    };
    if config.max_leg == 0 {
        bail!("max_leg must be at least 1");
    }
    if config.clock.end_time.is_none() {
        bail!("clock.end_time is required; the demo has no other stop condition");
    }
    Ok(config)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let path = std::env::args().nth(1);
    let config = load_config(path.as_deref().map(Path::new))?;
    info!(?config, "loaded configuration");

    // 1. Scheduler with the depot model, then close the configuration phase.
    let mut scheduler = SchedulerBuilder::new()
        .config(config.clock.clone())
        .model(Depot::default())
        .build()?;
    scheduler.seal();

    // 2. Lifecycle logging.
    let lifecycle: ListenerRef<SimEvent> =
        Rc::new(|e: &SimEvent, _api: &EventApi<SimEvent>| match e.kind {
            SimEventKind::Started => info!(time = %e.time, "clock started"),
            SimEventKind::Stopped => info!(time = %e.time, "clock stopped"),
        });
    scheduler.event_api().add_listener(lifecycle, &[])?;

    // 3. Couriers: each is both a tick participant and a depot carrier.
    for id in 0..config.couriers {
        let courier = shared(Courier::new(id, config.max_leg, config.drop_off_time)?);
        if id == 0 {
            let trace: ListenerRef<StateTransitionEvent<Leg, Signal>> = Rc::new(
                |e: &StateTransitionEvent<Leg, Signal>,
                 _api: &EventApi<StateTransitionEvent<Leg, Signal>>| {
                    tracing::debug!(from = ?e.previous, on = ?e.trigger, to = ?e.next, "courier 0");
                },
            );
            courier
                .borrow()
                .fsm
                .event_api()
                .add_listener(trace, &[StateMachineEventKind::StateTransition])?;
            info!("courier behavior:\n{}", courier.borrow().fsm.to_dot());
        }
        let roles = Roles::new()
            .with::<dyn TickListener>(courier.clone())
            .with::<dyn Carrier>(courier);
        scheduler.register(roles)?;
    }
    info!(participants = scheduler.participant_count(), "fleet registered");

    // 4. Run.
    let t0 = Instant::now();
    scheduler.start()?;
    let elapsed = t0.elapsed();

    // 5. Summary.
    let depot = scheduler
        .model::<Depot>()
        .context("depot model missing")?;
    let depot = depot.borrow();
    println!(
        "Simulated {} ticks in {:.3} s",
        scheduler.tick_count(),
        elapsed.as_secs_f64()
    );
    println!();
    println!("{:<10} {:<12} {:<12}", "Courier", "Delivered", "Driven");
    println!("{}", "-".repeat(34));
    for carrier in depot.fleet() {
        let c = carrier.borrow();
        println!("{:<10} {:<12} {:<12}", c.id(), c.delivered(), c.distance_driven());
    }
    println!("{}", "-".repeat(34));
    println!("{:<10} {:<12}", "total", depot.total_delivered());

    Ok(())
}
