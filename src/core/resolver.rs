//! # Dependency resolver.
//!
//! Makes sure an initializer's whole dependency closure has run, then runs it.
//!
//! ## Algorithm
//! ```text
//! resolve(target):
//!   ├─ target on in-progress stack   → Err(CircularDependency(target))
//!   ├─ target in completed set       → TaskSkipped, Ok(Skipped)
//!   ├─ push target
//!   ├─ for dep in target.dependencies():
//!   │     ├─ not registered          → Err(MissingDependency(dep))
//!   │     └─ resolve(dep)?           (first error aborts, propagated unchanged)
//!   ├─ cancelled?                    → Ok(Cancelled)   (not run, not recorded)
//!   ├─ TaskExecuted, run_once(target)
//!   │     ├─ Err(Canceled), cancelled → Ok(Cancelled)   (not recorded, no TaskFailed)
//!   │     └─ Err(e)                  → TaskFailed event, Err(TaskFailed(target, e))
//!   └─ pop target, insert into completed set, Ok(Executed)
//! ```
//!
//! Recursing into dependencies before running produces a valid topological
//! order regardless of how callers order their dependency lists.
//!
//! The in-progress stack lives in the [`Resolver`] value and is scoped to one
//! top-level initializer of the phase loop; the completed set is borrowed
//! from the phase for the whole phase.

use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::core::{completed::CompletedSet, registry::Registry, runner::run_once};
use crate::error::{InitError, TaskError};
use crate::events::{Event, EventKind};
use crate::observers::ObserverSet;
use crate::tasks::{InitId, InitRef};

/// Outcome of a successful resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolution {
    /// The run operation was invoked and succeeded.
    Executed,
    /// Already completed earlier; nothing ran.
    Skipped,
    /// Cancellation was requested before the run operation started.
    Cancelled,
}

/// Resolution context for one top-level initializer.
pub(crate) struct Resolver<'a> {
    registry: &'a Registry,
    completed: &'a mut CompletedSet,
    observers: &'a ObserverSet,
    token: &'a CancellationToken,
    default_timeout: Option<Duration>,
    in_progress: Vec<InitId>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        registry: &'a Registry,
        completed: &'a mut CompletedSet,
        observers: &'a ObserverSet,
        token: &'a CancellationToken,
        default_timeout: Option<Duration>,
    ) -> Self {
        Self {
            registry,
            completed,
            observers,
            token,
            default_timeout,
            in_progress: Vec::new(),
        }
    }

    /// Resolves `target` and its dependency closure.
    pub fn resolve<'r>(
        &'r mut self,
        target: &'r InitRef,
    ) -> BoxFuture<'r, Result<Resolution, InitError>> {
        async move {
            let id = target.id();

            if self.in_progress.contains(id) {
                return Err(InitError::CircularDependency { id: id.clone() });
            }
            if self.completed.contains(id) {
                tracing::trace!(init = %id, "already completed, skipping");
                self.observers
                    .emit(Event::new(EventKind::TaskSkipped).with_init(id));
                return Ok(Resolution::Skipped);
            }
            self.in_progress.push(id.clone());

            for dep_id in target.dependencies() {
                let Some(dep) = self.registry.get(dep_id) else {
                    return Err(InitError::MissingDependency {
                        id: dep_id.clone(),
                        required_by: id.clone(),
                    });
                };
                let dep = InitRef::clone(dep);
                if self.resolve(&dep).await? == Resolution::Cancelled {
                    return Ok(Resolution::Cancelled);
                }
            }

            if self.token.is_cancelled() {
                tracing::debug!(init = %id, "cancelled before run");
                return Ok(Resolution::Cancelled);
            }

            self.observers
                .emit(Event::new(EventKind::TaskExecuted).with_init(id));
            let timeout = target.timeout().or(self.default_timeout);
            if let Err(source) = run_once(&**target, self.token, timeout).await {
                if matches!(source, TaskError::Canceled) && self.token.is_cancelled() {
                    tracing::debug!(init = %id, "run stopped on cancellation");
                    return Ok(Resolution::Cancelled);
                }
                tracing::warn!(init = %id, error = %source, "initializer failed");
                self.observers.emit(
                    Event::new(EventKind::TaskFailed)
                        .with_init(id)
                        .with_reason(source.to_string()),
                );
                return Err(InitError::TaskFailed {
                    id: id.clone(),
                    source,
                });
            }

            self.in_progress.pop();
            self.completed.insert(id.clone());
            Ok(Resolution::Executed)
        }
        .boxed()
    }
}
