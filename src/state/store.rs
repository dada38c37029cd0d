//! # State store: per-phase and composite state streams.
//!
//! [`StateStore`] holds three [`tokio::sync::watch`] channels:
//!
//! ```text
//! set_launch(s) ──► launch    ──┐
//!                               ├──► composite (recomputed on every write,
//! set_active(s) ──► active    ──┘     notifies only when the coarse value changes)
//! ```
//!
//! ## Rules
//! - Phase writes always notify receivers, even `Pending → Pending`.
//! - The composite is never written directly; it is derived from the two phases.
//! - Receivers observe the latest value only (watch semantics, no history).

use tokio::sync::watch;

use super::PhaseState;

/// Holds and broadcasts the phase states.
#[derive(Debug)]
pub struct StateStore {
    launch: watch::Sender<PhaseState>,
    active: watch::Sender<PhaseState>,
    composite: watch::Sender<PhaseState>,
}

impl StateStore {
    /// Creates a store with every state `Pending`.
    pub fn new() -> Self {
        Self {
            launch: watch::Sender::new(PhaseState::Pending),
            active: watch::Sender::new(PhaseState::Pending),
            composite: watch::Sender::new(PhaseState::Pending),
        }
    }

    pub fn launch(&self) -> PhaseState {
        self.launch.borrow().clone()
    }

    pub fn active(&self) -> PhaseState {
        self.active.borrow().clone()
    }

    pub fn composite(&self) -> PhaseState {
        self.composite.borrow().clone()
    }

    pub fn subscribe_launch(&self) -> watch::Receiver<PhaseState> {
        self.launch.subscribe()
    }

    pub fn subscribe_active(&self) -> watch::Receiver<PhaseState> {
        self.active.subscribe()
    }

    pub fn subscribe_composite(&self) -> watch::Receiver<PhaseState> {
        self.composite.subscribe()
    }

    pub(crate) fn set_launch(&self, state: PhaseState) {
        self.launch.send_replace(state);
        self.recompute();
    }

    pub(crate) fn set_active(&self, state: PhaseState) {
        self.active.send_replace(state);
        self.recompute();
    }

    fn recompute(&self) {
        let next = PhaseState::composite(&self.launch.borrow(), &self.active.borrow());
        self.composite.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
