//! Explicit entity capability sets.
//!
//! # Design
//!
//! Each role is a (usually unsized) trait type `R`, and an entity plays it by
//! handing over a `Shared<R>` handle to itself.  Handles are stored
//! type-erased behind `Rc<dyn Any>`, keyed by `TypeId::of::<R>()`, and
//! recovered by downcasting to exactly `Shared<R>`, so lookups are checked
//! and never rely on unsafe casts.
//!
//! # Usage
//!
//! ```rust
//! use sk_model::{Roles, shared};
//!
//! trait Vehicle { fn speed(&self) -> u32; }
//! struct Truck;
//! impl Vehicle for Truck { fn speed(&self) -> u32 { 80 } }
//!
//! let truck = shared(Truck);
//! let roles = Roles::new().with::<dyn Vehicle>(truck.clone());
//! assert!(roles.plays::<dyn Vehicle>());
//! assert_eq!(roles.get::<dyn Vehicle>().unwrap().borrow().speed(), 80);
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::rc::Rc;

use crate::Shared;

#[derive(Clone)]
struct RoleEntry {
    role:   TypeId,
    name:   &'static str,
    /// Always a `Shared<R>` for the `R` behind `role`.
    handle: Rc<dyn Any>,
}

/// The set of roles one entity plays, in declaration order.
///
/// Declaring the same role twice keeps the position of the first declaration
/// and the handle of the last.
#[derive(Clone, Default)]
pub struct Roles {
    entries: Vec<RoleEntry>,
}

impl Roles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`][Self::insert].
    pub fn with<R: ?Sized + 'static>(mut self, handle: Shared<R>) -> Self {
        self.insert(handle);
        self
    }

    /// Declare that the entity plays role `R` through `handle`.
    pub fn insert<R: ?Sized + 'static>(&mut self, handle: Shared<R>) {
        let entry = RoleEntry {
            role:   TypeId::of::<R>(),
            name:   std::any::type_name::<R>(),
            handle: Rc::new(handle),
        };
        match self.entries.iter_mut().find(|e| e.role == entry.role) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// The handle for role `R`, if the entity plays it.
    pub fn get<R: ?Sized + 'static>(&self) -> Option<Shared<R>> {
        let key = TypeId::of::<R>();
        self.entries
            .iter()
            .find(|e| e.role == key)
            .and_then(|e| e.handle.downcast_ref::<Shared<R>>())
            .cloned()
    }

    /// `true` if the entity plays role `R`.
    pub fn plays<R: ?Sized + 'static>(&self) -> bool {
        let key = TypeId::of::<R>();
        self.entries.iter().any(|e| e.role == key)
    }

    /// Number of distinct roles declared.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Role type names, in declaration order.  Intended for logging.
    pub fn role_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }
}

impl fmt::Debug for Roles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.role_names()).finish()
    }
}
