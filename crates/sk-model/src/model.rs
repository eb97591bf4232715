//! The `Model` trait — the extension point for subsystems that manage entities.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ModelResult;

/// Shared, single-threaded handle to a model or entity.
///
/// Entities are typically held by several parties at once (every model that
/// accepted them, plus the scheduler if they tick), so the kernel passes them
/// around as `Rc<RefCell<_>>`.
pub type Shared<T> = Rc<RefCell<T>>;

/// Wrap `value` in a fresh [`Shared`] handle.
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// A subsystem that manages entities playing role [`Model::Role`].
///
/// Only [`register`][Self::register] is required.
///
/// # Example
///
/// ```rust,ignore
/// struct Garage { vehicles: Vec<Shared<dyn Vehicle>> }
///
/// impl Model for Garage {
///     type Role = dyn Vehicle;
///
///     fn register(&mut self, vehicle: Shared<dyn Vehicle>) -> ModelResult<bool> {
///         self.vehicles.push(vehicle);
///         Ok(true)
///     }
/// }
/// ```
pub trait Model: 'static {
    /// The role an entity must play for this model to be offered it.
    type Role: ?Sized + 'static;

    /// Offer `entity` to the model.  Return `Ok(true)` if the model took it
    /// on, `Ok(false)` if it declined.  An `Err` aborts the registration.
    fn register(&mut self, entity: Shared<Self::Role>) -> ModelResult<bool>;

    /// Release a previously registered entity.
    ///
    /// Default: the model keeps no per-entity state and returns `Ok(false)`.
    fn unregister(&mut self, _entity: &Shared<Self::Role>) -> ModelResult<bool> {
        Ok(false)
    }
}
