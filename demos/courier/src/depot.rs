//! The depot model: keeps track of every carrier in the fleet.

use sk_model::{Model, ModelResult, Shared};
use tracing::debug;

use crate::courier::Carrier;

#[derive(Default)]
pub struct Depot {
    fleet: Vec<Shared<dyn Carrier>>,
}

impl Depot {
    pub fn fleet(&self) -> &[Shared<dyn Carrier>] {
        &self.fleet
    }

    pub fn total_delivered(&self) -> u32 {
        self.fleet.iter().map(|c| c.borrow().delivered()).sum()
    }
}

impl Model for Depot {
    type Role = dyn Carrier;

    fn register(&mut self, carrier: Shared<dyn Carrier>) -> ModelResult<bool> {
        debug!(carrier = carrier.borrow().id(), "carrier joined the fleet");
        self.fleet.push(carrier);
        Ok(true)
    }
}
