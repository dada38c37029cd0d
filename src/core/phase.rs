//! # Phase executor.
//!
//! Runs every initializer of one priority class, one at a time, in
//! registration order, resolving each through a fresh [`Resolver`].
//!
//! ```text
//! for init in registry.phase(priority):
//!   ├─ token cancelled?        → Ok(Cancelled)   (state left untouched by caller)
//!   ├─ Resolver::new(..)       (fresh in-progress stack)
//!   └─ resolve(init)?          (first error aborts the whole phase)
//! Ok(Finished)
//! ```

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::core::{
    completed::CompletedSet,
    registry::Registry,
    resolver::{Resolution, Resolver},
};
use crate::error::InitError;
use crate::observers::ObserverSet;
use crate::tasks::Priority;

/// How a phase ended when no error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PhaseOutcome {
    /// Every initializer resolved.
    Finished,
    /// A cancellation request was observed at a checkpoint.
    Cancelled,
}

pub(crate) struct PhaseRun<'a> {
    pub registry: &'a Registry,
    pub observers: &'a ObserverSet,
    pub token: &'a CancellationToken,
    pub default_timeout: Option<Duration>,
}

impl PhaseRun<'_> {
    pub async fn run(
        &self,
        priority: Priority,
        completed: &mut CompletedSet,
    ) -> Result<PhaseOutcome, InitError> {
        for init in self.registry.phase(priority) {
            if self.token.is_cancelled() {
                tracing::debug!(phase = priority.as_label(), "phase cancelled");
                return Ok(PhaseOutcome::Cancelled);
            }
            let mut resolver = Resolver::new(
                self.registry,
                completed,
                self.observers,
                self.token,
                self.default_timeout,
            );
            if resolver.resolve(init).await? == Resolution::Cancelled {
                tracing::debug!(phase = priority.as_label(), init = %init.id(), "phase cancelled");
                return Ok(PhaseOutcome::Cancelled);
            }
        }
        Ok(PhaseOutcome::Finished)
    }
}
