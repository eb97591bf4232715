//! Unit tests for sk-model.

use std::cell::RefCell;
use std::rc::Rc;

use crate::{Model, ModelError, ModelRegistry, ModelResult, Roles, Shared, shared};

// ── Helpers ───────────────────────────────────────────────────────────────────

trait Vehicle {
    fn plate(&self) -> &str;
}

trait Cargo {
    fn weight(&self) -> u32;
}

struct Truck {
    plate: String,
}

impl Vehicle for Truck {
    fn plate(&self) -> &str {
        &self.plate
    }
}

impl Cargo for Truck {
    fn weight(&self) -> u32 {
        7_500
    }
}

struct Crate;

impl Cargo for Crate {
    fn weight(&self) -> u32 {
        20
    }
}

type Journal = Rc<RefCell<Vec<String>>>;

/// Accepts every vehicle and logs the plate.
struct Garage {
    journal:  Journal,
    vehicles: Vec<Shared<dyn Vehicle>>,
}

impl Model for Garage {
    type Role = dyn Vehicle;

    fn register(&mut self, vehicle: Shared<dyn Vehicle>) -> ModelResult<bool> {
        self.journal
            .borrow_mut()
            .push(format!("garage {}", vehicle.borrow().plate()));
        self.vehicles.push(vehicle);
        Ok(true)
    }

    fn unregister(&mut self, vehicle: &Shared<dyn Vehicle>) -> ModelResult<bool> {
        let before = self.vehicles.len();
        self.vehicles.retain(|v| !Rc::ptr_eq(v, vehicle));
        Ok(self.vehicles.len() < before)
    }
}

/// Accepts only cargo lighter than a limit.
struct Scale {
    journal: Journal,
    limit:   u32,
}

impl Model for Scale {
    type Role = dyn Cargo;

    fn register(&mut self, cargo: Shared<dyn Cargo>) -> ModelResult<bool> {
        let weight = cargo.borrow().weight();
        self.journal.borrow_mut().push(format!("scale {weight}"));
        Ok(weight <= self.limit)
    }
}

/// Always fails.
struct Broken;

impl Model for Broken {
    type Role = dyn Cargo;

    fn register(&mut self, _cargo: Shared<dyn Cargo>) -> ModelResult<bool> {
        Err(ModelError::callback::<Self>("scale out of calibration"))
    }
}

fn garage(journal: &Journal) -> Garage {
    Garage { journal: Rc::clone(journal), vehicles: Vec::new() }
}

fn truck_roles(plate: &str) -> (Shared<Truck>, Roles) {
    let truck = shared(Truck { plate: plate.into() });
    let roles = Roles::new()
        .with::<dyn Vehicle>(truck.clone())
        .with::<dyn Cargo>(truck.clone());
    (truck, roles)
}

// ── Roles ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod roles_tests {
    use super::*;

    #[test]
    fn declared_roles_are_retrievable() {
        let (truck, roles) = truck_roles("AB-123");
        assert_eq!(roles.len(), 2);
        assert!(roles.plays::<dyn Vehicle>());
        assert!(roles.plays::<dyn Cargo>());
        assert_eq!(roles.get::<dyn Vehicle>().unwrap().borrow().plate(), "AB-123");
        // Both roles point at the same allocation.
        let as_vehicle = roles.get::<dyn Vehicle>().unwrap();
        assert_eq!(
            Rc::as_ptr(&as_vehicle) as *const () as usize,
            Rc::as_ptr(&truck) as *const () as usize
        );
    }

    #[test]
    fn undeclared_role_is_absent() {
        let roles = Roles::new().with::<dyn Cargo>(shared(Crate));
        assert!(!roles.plays::<dyn Vehicle>());
        assert!(roles.get::<dyn Vehicle>().is_none());
    }

    #[test]
    fn redeclaring_a_role_replaces_the_handle() {
        let first = shared(Truck { plate: "ONE".into() });
        let second = shared(Truck { plate: "TWO".into() });
        let roles = Roles::new()
            .with::<dyn Vehicle>(first)
            .with::<dyn Vehicle>(second);
        assert_eq!(roles.len(), 1);
        assert_eq!(roles.get::<dyn Vehicle>().unwrap().borrow().plate(), "TWO");
    }

    #[test]
    fn concrete_types_are_roles_too() {
        let truck = shared(Truck { plate: "X".into() });
        let roles = Roles::new().with(truck);
        assert!(roles.plays::<Truck>());
        assert!(!roles.plays::<dyn Vehicle>());
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod registry_tests {
    use super::*;

    #[test]
    fn duplicate_model_type_rejected() {
        let journal = Journal::default();
        let mut registry = ModelRegistry::new();
        registry.add_model(garage(&journal)).unwrap();
        let err = registry.add_model(garage(&journal)).map(|_| ()).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateModel(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn add_after_seal_fails_for_every_model() {
        let journal = Journal::default();
        let mut registry = ModelRegistry::new();
        registry.seal();
        assert!(matches!(
            registry.add_model(garage(&journal)),
            Err(ModelError::Sealed(_))
        ));
        assert!(matches!(
            registry.add_model(Scale { journal: Rc::clone(&journal), limit: 1 }),
            Err(ModelError::Sealed(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn register_before_seal_fails() {
        let journal = Journal::default();
        let mut registry = ModelRegistry::new();
        registry.add_model(garage(&journal)).unwrap();
        let (_truck, roles) = truck_roles("A");
        assert!(matches!(registry.register_entity(&roles), Err(ModelError::NotSealed)));
        assert!(journal.borrow().is_empty());
    }

    #[test]
    fn empty_roles_rejected() {
        let mut registry = ModelRegistry::new();
        registry.seal();
        assert!(matches!(
            registry.register_entity(&Roles::new()),
            Err(ModelError::NoRoles)
        ));
    }

    #[test]
    fn entity_routed_to_every_matching_model_in_order() {
        let journal = Journal::default();
        let mut registry = ModelRegistry::new();
        registry
            .add_model(Scale { journal: Rc::clone(&journal), limit: 10_000 })
            .unwrap();
        let garage = registry.add_model(garage(&journal)).unwrap();
        registry.seal();

        let (_truck, roles) = truck_roles("AB-123");
        assert!(registry.register_entity(&roles).unwrap());
        assert_eq!(*journal.borrow(), vec!["scale 7500", "garage AB-123"]);
        assert_eq!(garage.borrow().vehicles.len(), 1);
    }

    #[test]
    fn acceptance_by_zero_models_returns_false() {
        let journal = Journal::default();
        let mut registry = ModelRegistry::new();
        registry.add_model(garage(&journal)).unwrap();
        registry.seal();

        // A crate is not a vehicle: no model is even offered it.
        let roles = Roles::new().with::<dyn Cargo>(shared(Crate));
        assert!(!registry.register_entity(&roles).unwrap());
        assert!(journal.borrow().is_empty());
    }

    #[test]
    fn declining_model_does_not_count_as_acceptance() {
        let journal = Journal::default();
        let mut registry = ModelRegistry::new();
        registry
            .add_model(Scale { journal: Rc::clone(&journal), limit: 100 })
            .unwrap();
        registry.seal();

        let (_truck, roles) = truck_roles("HEAVY");
        assert!(!registry.register_entity(&roles).unwrap());
        assert_eq!(*journal.borrow(), vec!["scale 7500"]);
    }

    #[test]
    fn model_callback_error_propagates_and_halts() {
        let journal = Journal::default();
        let mut registry = ModelRegistry::new();
        registry.add_model(Broken).unwrap();
        registry.add_model(garage(&journal)).unwrap();
        registry.seal();

        let (_truck, roles) = truck_roles("A");
        let err = registry.register_entity(&roles).unwrap_err();
        assert!(matches!(err, ModelError::Callback { .. }));
        // The garage comes after the failing model and is never reached.
        assert!(journal.borrow().is_empty());
    }

    #[test]
    fn unregister_routes_to_models() {
        let journal = Journal::default();
        let mut registry = ModelRegistry::new();
        let garage = registry.add_model(garage(&journal)).unwrap();
        registry.seal();

        let (_truck, roles) = truck_roles("A");
        registry.register_entity(&roles).unwrap();
        assert!(registry.unregister_entity(&roles).unwrap());
        assert!(garage.borrow().vehicles.is_empty());
        // Second removal finds nothing.
        assert!(!registry.unregister_entity(&roles).unwrap());
    }

    #[test]
    fn typed_lookup() {
        let journal = Journal::default();
        let mut registry = ModelRegistry::new();
        registry.add_model(garage(&journal)).unwrap();
        assert!(registry.model::<Garage>().is_some());
        assert!(registry.model::<Scale>().is_none());
        assert!(registry.handles_role::<dyn Vehicle>());
        assert!(!registry.handles_role::<dyn Cargo>());
        assert_eq!(registry.model_names().count(), 1);
    }

    #[test]
    fn seal_is_idempotent() {
        let mut registry = ModelRegistry::new();
        registry.seal();
        registry.seal();
        assert!(registry.is_sealed());
    }
}
