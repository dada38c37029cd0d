use std::sync::Arc;

use tokio::sync::mpsc;

use super::{
    config::LifecycleConfig,
    coordinator::Coordinator,
    lifecycle::Lifecycle,
    registry::Registry,
    sequence::Shared,
};
use crate::{
    error::BuildError,
    observers::{Observe, ObserverSet},
    tasks::InitRef,
};

/// Builder for constructing a [`Lifecycle`].
pub struct LifecycleBuilder {
    cfg: LifecycleConfig,
    inits: Vec<InitRef>,
    observers: Vec<Arc<dyn Observe>>,
}

impl LifecycleBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: LifecycleConfig) -> Self {
        Self {
            cfg,
            inits: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// Sets the initializers, in registration order.
    pub fn with_initializers(mut self, inits: Vec<InitRef>) -> Self {
        self.inits = inits;
        self
    }

    /// Appends one initializer.
    pub fn with_initializer(mut self, init: InitRef) -> Self {
        self.inits.push(init);
        self
    }

    /// Sets lifecycle observers.
    ///
    /// Observers receive lifecycle events through dedicated workers with bounded queues.
    pub fn with_observers(mut self, observers: Vec<Arc<dyn Observe>>) -> Self {
        self.observers = observers;
        self
    }

    /// Builds the lifecycle and starts the launch phase.
    ///
    /// This consumes the builder and initializes all runtime components:
    /// - Registry (rejects duplicate ids)
    /// - Observer workers
    /// - Coordinator task, which immediately spawns the launch sequence
    ///
    /// Must be called from within a tokio runtime.
    pub fn build(self) -> Result<Lifecycle, BuildError> {
        let registry = Registry::new(self.inits)?;
        let observers = ObserverSet::new(self.observers, self.cfg.observer_capacity_clamped());
        tracing::debug!(
            initializers = registry.len(),
            observers = observers.len(),
            "building lifecycle"
        );

        let (tx, rx) = mpsc::channel(self.cfg.trigger_capacity_clamped());
        let shared = Arc::new(Shared::new(self.cfg, registry, observers));
        Coordinator::spawn(Arc::clone(&shared), rx);

        Ok(Lifecycle::new(tx, shared))
    }
}
