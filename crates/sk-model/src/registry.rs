//! `ModelRegistry` — the ordered, sealable set of models.

use std::any::{Any, TypeId, type_name};
use std::rc::Rc;

use tracing::{debug, trace};

use crate::{Model, ModelError, ModelResult, Roles, Shared, shared};

// ── Type-erased model slot ────────────────────────────────────────────────────

/// Object-safe view of a `Shared<M>` so models of different types can live in
/// one ordered `Vec`.
trait ModelSlot {
    fn model_type(&self) -> TypeId;
    fn role_type(&self) -> TypeId;
    fn name(&self) -> &'static str;
    fn role_name(&self) -> &'static str;

    /// `None` if the entity does not play this model's role.
    fn offer(&self, roles: &Roles) -> ModelResult<Option<bool>>;
    fn withdraw(&self, roles: &Roles) -> ModelResult<Option<bool>>;

    /// The `Shared<M>` handle, for typed lookup.
    fn handle(&self) -> &dyn Any;
}

struct TypedSlot<M: Model>(Shared<M>);

impl<M: Model> ModelSlot for TypedSlot<M> {
    fn model_type(&self) -> TypeId {
        TypeId::of::<M>()
    }

    fn role_type(&self) -> TypeId {
        TypeId::of::<M::Role>()
    }

    fn name(&self) -> &'static str {
        type_name::<M>()
    }

    fn role_name(&self) -> &'static str {
        type_name::<M::Role>()
    }

    fn offer(&self, roles: &Roles) -> ModelResult<Option<bool>> {
        match roles.get::<M::Role>() {
            None => Ok(None),
            Some(entity) => self.0.borrow_mut().register(entity).map(Some),
        }
    }

    fn withdraw(&self, roles: &Roles) -> ModelResult<Option<bool>> {
        match roles.get::<M::Role>() {
            None => Ok(None),
            Some(entity) => self.0.borrow_mut().unregister(&entity).map(Some),
        }
    }

    fn handle(&self) -> &dyn Any {
        &self.0
    }
}

// ── ModelRegistry ─────────────────────────────────────────────────────────────

/// Ordered collection of models, at most one per concrete model type.
///
/// Model order is registration order and is the order in which entities are
/// offered to models; it is never changed, so runs are reproducible.
#[derive(Default)]
pub struct ModelRegistry {
    models: Vec<Box<dyn ModelSlot>>,
    sealed: bool,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `model` and return a shared handle to it.
    pub fn add_model<M: Model>(&mut self, model: M) -> ModelResult<Shared<M>> {
        let handle = shared(model);
        self.add_shared_model(Rc::clone(&handle))?;
        Ok(handle)
    }

    /// Add a model the caller already holds a handle to.
    ///
    /// Fails without side effects if the registry is sealed or already holds
    /// a model of type `M`.
    pub fn add_shared_model<M: Model>(&mut self, model: Shared<M>) -> ModelResult<()> {
        if self.sealed {
            return Err(ModelError::Sealed(type_name::<M>()));
        }
        if self.models.iter().any(|m| m.model_type() == TypeId::of::<M>()) {
            return Err(ModelError::DuplicateModel(type_name::<M>()));
        }
        let slot = TypedSlot(model);
        debug!(model = slot.name(), role = slot.role_name(), "model added");
        self.models.push(Box::new(slot));
        Ok(())
    }

    /// Close the model set.  Idempotent.
    pub fn seal(&mut self) {
        if !self.sealed {
            debug!(models = self.models.len(), "model registry sealed");
            self.sealed = true;
        }
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Offer an entity to every model whose role it plays, in model order.
    ///
    /// Returns `Ok(true)` if at least one model accepted it and `Ok(false)`
    /// if none did (including when no model handles any of its roles).  The
    /// first model callback error aborts the walk and is returned as-is;
    /// models earlier in the order keep the entity.
    pub fn register_entity(&mut self, roles: &Roles) -> ModelResult<bool> {
        if !self.sealed {
            return Err(ModelError::NotSealed);
        }
        if roles.is_empty() {
            return Err(ModelError::NoRoles);
        }
        let mut accepted = false;
        for slot in &self.models {
            if let Some(taken) = slot.offer(roles)? {
                trace!(model = slot.name(), taken, "entity offered to model");
                accepted |= taken;
            }
        }
        debug!(?roles, accepted, "entity registered");
        Ok(accepted)
    }

    /// Withdraw an entity from every model whose role it plays.
    ///
    /// Returns `Ok(true)` if at least one model reported releasing it.
    pub fn unregister_entity(&mut self, roles: &Roles) -> ModelResult<bool> {
        if !self.sealed {
            return Err(ModelError::NotSealed);
        }
        if roles.is_empty() {
            return Err(ModelError::NoRoles);
        }
        let mut released = false;
        for slot in &self.models {
            if let Some(done) = slot.withdraw(roles)? {
                released |= done;
            }
        }
        debug!(?roles, released, "entity unregistered");
        Ok(released)
    }

    /// The registered model of type `M`, if any.
    pub fn model<M: Model>(&self) -> Option<Shared<M>> {
        self.models
            .iter()
            .find_map(|m| m.handle().downcast_ref::<Shared<M>>())
            .cloned()
    }

    /// `true` if some model handles role `R`.
    pub fn handles_role<R: ?Sized + 'static>(&self) -> bool {
        let probe = TypeId::of::<R>();
        self.models.iter().any(|m| m.role_type() == probe)
    }

    /// Model type names in registration order.
    pub fn model_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.models.iter().map(|m| m.name())
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
