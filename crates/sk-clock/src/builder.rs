//! Fluent builder for constructing a [`Scheduler`].

use sk_core::ClockConfig;
use sk_model::{Model, ModelError, ModelRegistry, ModelResult, Shared};

use crate::{Scheduler, SimResult};

/// Fluent builder for [`Scheduler`].
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                   |
/// |---------------------|---------------------------|
/// | `.config(c)`        | `ClockConfig::default()`  |
/// | `.time_step(n)`     | 1000                      |
/// | `.model(m)`         | no models                 |
///
/// The built scheduler is still in its configuration phase: more models may
/// be added with [`Scheduler::register_model`] until it is sealed.
///
/// # Example
///
/// ```rust,ignore
/// let mut scheduler = SchedulerBuilder::new()
///     .time_step(100)
///     .model(Garage::default())
///     .build()?;
/// ```
#[derive(Default)]
pub struct SchedulerBuilder {
    config: ClockConfig,
    models: ModelRegistry,
    /// First model registration failure, reported by `build`.
    error:  Option<ModelError>,
}

impl SchedulerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole clock configuration.
    pub fn config(mut self, config: ClockConfig) -> Self {
        self.config = config;
        self
    }

    pub fn time_step(mut self, step: u64) -> Self {
        self.config.time_step = step;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Add a model.  A duplicate model type makes `build` fail.
    pub fn model<M: Model>(mut self, model: M) -> Self {
        let result = self.models.add_model(model).map(|_| ());
        self.record(result);
        self
    }

    /// Add a model the caller keeps a handle to.
    pub fn shared_model<M: Model>(mut self, model: Shared<M>) -> Self {
        let result = self.models.add_shared_model(model);
        self.record(result);
        self
    }

    fn record(&mut self, result: ModelResult<()>) {
        if let Err(err) = result {
            self.error.get_or_insert(err);
        }
    }

    /// Validate the configuration and return an unsealed [`Scheduler`].
    pub fn build(self) -> SimResult<Scheduler> {
        if let Some(err) = self.error {
            return Err(err.into());
        }
        Scheduler::from_parts(self.config, self.models)
    }
}
