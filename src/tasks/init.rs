//! # Initializer abstraction.
//!
//! This module defines the [`Initializer`] trait (async, cancelable) and the
//! [`Priority`] class that decides in which phase an initializer runs.
//!
//! An initializer receives a [`CancellationToken`]. For `Active` initializers it is
//! the token of the current active cycle, so a long run may stop cooperatively
//! when the application moves to the background. The runtime never aborts a run.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;
use crate::tasks::InitId;

/// Phase an initializer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    /// Runs exactly once, when the lifecycle starts.
    Launch,
    /// Runs on every foreground transition, re-run in full each cycle.
    Active,
}

impl Priority {
    /// Returns a short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Priority::Launch => "launch",
            Priority::Active => "active",
        }
    }
}

/// # Unit of startup work.
///
/// An `Initializer` has a stable [`id`](Initializer::id), a [`priority`](Initializer::priority),
/// the ids it [depends on](Initializer::dependencies) and an async [`run`](Initializer::run) method.
///
/// Only immediate dependencies need to be listed; the resolver runs the whole
/// dependency closure first.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use async_trait::async_trait;
/// use initvisor::{InitId, Initializer, Priority, TaskError};
///
/// struct Migrations {
///     id: InitId,
///     deps: Vec<InitId>,
/// }
///
/// #[async_trait]
/// impl Initializer for Migrations {
///     fn id(&self) -> &InitId { &self.id }
///     fn priority(&self) -> Priority { Priority::Launch }
///     fn dependencies(&self) -> &[InitId] { &self.deps }
///
///     async fn run(&self, _ctx: CancellationToken) -> Result<(), TaskError> {
///         // apply migrations...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Initializer: Send + Sync + 'static {
    /// Returns the identity, unique within a registry.
    fn id(&self) -> &InitId;

    /// Returns the phase this initializer belongs to.
    fn priority(&self) -> Priority;

    /// Returns the identities this initializer depends on, in resolution order.
    fn dependencies(&self) -> &[InitId] {
        &[]
    }

    /// Per-run timeout; `None` falls back to [`LifecycleConfig::timeout`](crate::LifecycleConfig::timeout).
    fn timeout(&self) -> Option<Duration> {
        None
    }

    /// Performs the work.
    async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError>;
}
