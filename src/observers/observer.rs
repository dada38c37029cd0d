//! # Observer: hooks into the lifecycle.
//!
//! The [`Observe`] trait is the extension point for analytics, logging or UI
//! glue that wants to follow the lifecycle without being part of it.
//! Every hook has a no-op default, so implementors override only what they need.
//!
//! Each observer gets:
//! - **Dedicated worker task** (runs independently of the phases)
//! - **Per-observer bounded queue** (capacity via [`Observe::queue_capacity`])
//! - **Panic isolation** (panics are caught and logged)
//!
//! ## Architecture
//! ```text
//! ObserverSet ──► [bounded queue] ──► worker task ──► observer.on_event(&Event)
//!                                                        └─► default: dispatch to hooks
//!                                                              launch_phase_started()
//!                                                              launch_phase_completed(&state)
//!                                                              active_phase_started()
//!                                                              active_phase_completed(&state)
//!                                                              task_skipped(&id)
//!                                                              task_executed(&id)
//!                                                              task_failed(&id, reason)
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use initvisor::{InitId, Observe};
//!
//! #[derive(Default)]
//! struct Analytics {
//!     executed: AtomicUsize,
//! }
//!
//! impl Observe for Analytics {
//!     fn task_executed(&self, _id: &InitId) {
//!         self.executed.fetch_add(1, Ordering::Relaxed);
//!     }
//!
//!     fn name(&self) -> &'static str { "analytics" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::state::PhaseState;
use crate::tasks::InitId;

/// Lifecycle observer.
///
/// ### Implementation requirements
/// - Hooks are called from the observer's worker task, never from a phase.
/// - Hooks are synchronous; override [`Observe::on_event`] for async work.
/// - Slow processing affects only this observer's queue.
#[async_trait]
pub trait Observe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// The default implementation dispatches to the hook methods below.
    /// Events are delivered in FIFO order per observer.
    async fn on_event(&self, event: &Event) {
        dispatch(self, event);
    }

    fn launch_phase_started(&self) {}

    fn launch_phase_completed(&self, _state: &PhaseState) {}

    fn active_phase_started(&self) {}

    /// Also fired when a background transition cancels the active phase; the
    /// state is then the current, usually non-terminal, value.
    fn active_phase_completed(&self, _state: &PhaseState) {}

    fn task_skipped(&self, _id: &InitId) {}

    fn task_executed(&self, _id: &InitId) {}

    fn task_failed(&self, _id: &InitId, _reason: &str) {}

    /// Returns the observer name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the preferred queue capacity for this observer.
    ///
    /// `None` uses [`LifecycleConfig::observer_capacity`](crate::LifecycleConfig::observer_capacity).
    /// The runtime clamps capacity to a minimum of 1.
    fn queue_capacity(&self) -> Option<usize> {
        None
    }
}

/// Routes an event to the matching hook of `obs`.
///
/// Events missing their payload (a hand-built `Event` without `init`/`state`)
/// are ignored.
pub fn dispatch<O: Observe + ?Sized>(obs: &O, event: &Event) {
    match event.kind {
        EventKind::LaunchPhaseStarted => obs.launch_phase_started(),
        EventKind::ActivePhaseStarted => obs.active_phase_started(),
        EventKind::LaunchPhaseCompleted => {
            if let Some(state) = &event.state {
                obs.launch_phase_completed(state);
            }
        }
        EventKind::ActivePhaseCompleted => {
            if let Some(state) = &event.state {
                obs.active_phase_completed(state);
            }
        }
        EventKind::TaskSkipped => {
            if let Some(id) = &event.init {
                obs.task_skipped(id);
            }
        }
        EventKind::TaskExecuted => {
            if let Some(id) = &event.init {
                obs.task_executed(id);
            }
        }
        EventKind::TaskFailed => {
            if let Some(id) = &event.init {
                obs.task_failed(id, event.reason.as_deref().unwrap_or(""));
            }
        }
    }
}
