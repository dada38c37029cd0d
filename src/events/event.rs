//! # Lifecycle events delivered to observers.
//!
//! The [`EventKind`] enum classifies event types across two categories:
//! - **Phase events**: launch/active phase started and completed
//! - **Task events**: an initializer was skipped, executed, or failed
//!
//! The [`Event`] struct carries additional metadata such as timestamps, the
//! initializer id, the phase state and a failure reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use initvisor::{Event, EventKind, PhaseState};
//!
//! let ev = Event::new(EventKind::ActivePhaseCompleted).with_state(PhaseState::Complete);
//!
//! assert_eq!(ev.kind, EventKind::ActivePhaseCompleted);
//! assert_eq!(ev.state, Some(PhaseState::Complete));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::state::PhaseState;
use crate::tasks::InitId;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Phase events ===
    /// Launch phase is about to run.
    ///
    /// Sets:
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    LaunchPhaseStarted,

    /// Launch phase reached a terminal state.
    ///
    /// Sets:
    /// - `state`: resulting launch state
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    LaunchPhaseCompleted,

    /// Active phase is about to run (launch already resolved successfully).
    ///
    /// Not emitted by a cycle cancelled while it waited for launch.
    ///
    /// Sets:
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ActivePhaseStarted,

    /// Active phase finished, or was cancelled by a background transition.
    ///
    /// Emitted at most once per cycle.
    ///
    /// On cancellation `state` is whatever the active phase held at that moment,
    /// typically still `Pending`.
    ///
    /// Sets:
    /// - `state`: current active state
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ActivePhaseCompleted,

    // === Task events ===
    /// Initializer already completed in this process; not run again.
    ///
    /// Sets:
    /// - `init`: initializer id
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskSkipped,

    /// Initializer's dependencies resolved; its run operation is starting.
    ///
    /// Sets:
    /// - `init`: initializer id
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskExecuted,

    /// Initializer's run operation returned an error.
    ///
    /// Sets:
    /// - `init`: initializer id
    /// - `reason`: error message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskFailed,
}

/// Lifecycle event with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Initializer id, for task events.
    pub init: Option<InitId>,
    /// Phase state, for completed events.
    pub state: Option<PhaseState>,
    /// Human-readable reason (errors).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            init: None,
            state: None,
            reason: None,
        }
    }

    /// Attaches an initializer id.
    #[inline]
    pub fn with_init(mut self, id: impl Into<InitId>) -> Self {
        self.init = Some(id.into());
        self
    }

    /// Attaches a phase state.
    #[inline]
    pub fn with_state(mut self, state: PhaseState) -> Self {
        self.state = Some(state);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    #[inline]
    pub fn is_phase_event(&self) -> bool {
        matches!(
            self.kind,
            EventKind::LaunchPhaseStarted
                | EventKind::LaunchPhaseCompleted
                | EventKind::ActivePhaseStarted
                | EventKind::ActivePhaseCompleted
        )
    }
}
