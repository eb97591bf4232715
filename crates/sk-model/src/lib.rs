//! `sk-model` — routing entities to the models that manage them.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`roles`]    | `Roles` — the capability set an entity declares on registration |
//! | [`model`]    | `Model` trait, `Shared<T>` handle alias                      |
//! | [`registry`] | `ModelRegistry` — ordered, sealable model set                |
//! | [`error`]    | `ModelError`, `ModelResult<T>`                               |
//!
//! # Design notes
//!
//! The registry never inspects entity types.  Instead, an entity registers
//! itself with an explicit [`Roles`] value listing the trait-object handles
//! it can be seen through (`Shared<dyn Vehicle>`, `Shared<dyn Parcel>`, …).
//! Each model declares one role type; the registry offers an entity to every
//! model whose role appears in the entity's `Roles`, in model registration
//! order.
//!
//! Registration has two phases.  Models are added first; [`ModelRegistry::seal`]
//! closes the model set, after which only entities may be registered.

pub mod error;
pub mod model;
pub mod registry;
pub mod roles;

#[cfg(test)]
mod tests;

pub use error::{ModelError, ModelResult};
pub use model::{Model, Shared, shared};
pub use registry::ModelRegistry;
pub use roles::Roles;
