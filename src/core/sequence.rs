//! # Launch and active sequences.
//!
//! [`Shared`] is the state every phase works on. Its two sequences are the
//! only writers of the phase states and the completed set.
//!
//! ```text
//! launch():                               active(cycle):
//!   launch = Pending                        active = Pending
//!   LaunchPhaseStarted                      wait until launch is terminal
//!   lock completed set                      cancelled? → return
//!   run Launch phase                        launch Failed? → settle, active = launch, return
//!   launch = Complete | Failed(e)           ActivePhaseStarted
//!   LaunchPhaseCompleted(launch)            lock completed set, evict Active ids
//!                                           run Active phase
//!                                           ├─ Cancelled  → state untouched, return
//!                                           ├─ settle lost → state untouched, return
//!                                           ├─ Finished   → active = Complete
//!                                           └─ Err(e)     → active = Failed(e)
//!                                           ActivePhaseCompleted(active)
//! ```
//!
//! The completed set is locked for the whole phase, so at most one phase
//! executor runs at a time even if sequences overlap.
//!
//! A [`Cycle`] ends exactly once: either the cycle settles itself before its
//! terminal write, or the coordinator cancels it and reports the current
//! state. Whichever comes first wins; the other side does nothing.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::core::{
    completed::CompletedSet,
    config::LifecycleConfig,
    phase::{PhaseOutcome, PhaseRun},
    registry::Registry,
};
use crate::events::{Event, EventKind};
use crate::observers::ObserverSet;
use crate::state::{PhaseState, StateStore};
use crate::tasks::Priority;

/// One active cycle: its cancellation token and an end-once latch.
#[derive(Debug, Default)]
pub(crate) struct Cycle {
    token: CancellationToken,
    ended: AtomicBool,
}

impl Cycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Cancels the cycle unless it already ended. Returns `true` if this call ended it.
    pub fn cancel(&self) -> bool {
        if self.ended.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.token.cancel();
        true
    }

    /// Claims the cycle's terminal write. Returns `false` if it was cancelled first.
    fn settle(&self) -> bool {
        !self.ended.swap(true, Ordering::AcqRel)
    }
}

pub(crate) struct Shared {
    pub cfg: LifecycleConfig,
    pub registry: Registry,
    pub completed: Mutex<CompletedSet>,
    pub store: StateStore,
    pub observers: ObserverSet,
}

impl Shared {
    pub fn new(cfg: LifecycleConfig, registry: Registry, observers: ObserverSet) -> Self {
        Self {
            cfg,
            registry,
            completed: Mutex::new(CompletedSet::new()),
            store: StateStore::new(),
            observers,
        }
    }

    fn phase<'a>(&'a self, token: &'a CancellationToken) -> PhaseRun<'a> {
        PhaseRun {
            registry: &self.registry,
            observers: &self.observers,
            token,
            default_timeout: self.cfg.default_timeout(),
        }
    }

    /// Runs the Launch phase. Not cancellable.
    pub async fn launch(&self) {
        self.store.set_launch(PhaseState::Pending);
        self.observers.emit(Event::new(EventKind::LaunchPhaseStarted));
        tracing::info!("launch phase started");

        let token = CancellationToken::new();
        let res = {
            let mut completed = self.completed.lock().await;
            self.phase(&token).run(Priority::Launch, &mut completed).await
        };

        let state = PhaseState::from(res.map(|_| ()));
        log_completed(Priority::Launch, &state);
        self.store.set_launch(state.clone());
        self.observers
            .emit(Event::new(EventKind::LaunchPhaseCompleted).with_state(state));
    }

    /// Runs one Active cycle, observing its token at the phase checkpoints.
    pub async fn active(&self, cycle: &Cycle) {
        self.store.set_active(PhaseState::Pending);

        let launch = self
            .store
            .subscribe_launch()
            .wait_for(PhaseState::is_terminal)
            .await
            .map(|state| state.clone());
        let Ok(launch) = launch else {
            return;
        };
        if cycle.token().is_cancelled() {
            tracing::debug!("active cycle cancelled while waiting for launch");
            return;
        }
        if launch.is_failed() {
            if cycle.settle() {
                tracing::warn!("launch phase failed, active initializers not attempted");
                self.store.set_active(launch);
            }
            return;
        }

        self.observers.emit(Event::new(EventKind::ActivePhaseStarted));
        tracing::info!("active phase started");

        let res = {
            let mut completed = self.completed.lock().await;
            completed.evict(Priority::Active, &self.registry);
            tracing::debug!(completed = completed.len(), "evicted active initializers");
            self.phase(cycle.token()).run(Priority::Active, &mut completed).await
        };

        if matches!(res, Ok(PhaseOutcome::Cancelled)) || !cycle.settle() {
            return;
        }
        match res {
            Ok(_) => self.store.set_active(PhaseState::Complete),
            Err(e) => self.store.set_active(PhaseState::Failed(Arc::new(e))),
        }
        let state = self.store.active();
        log_completed(Priority::Active, &state);
        self.observers
            .emit(Event::new(EventKind::ActivePhaseCompleted).with_state(state));
    }

    /// Reports a cancelled active cycle with whatever state it currently holds.
    pub fn report_active_cancelled(&self) {
        let state = self.store.active();
        tracing::info!(state = state.as_label(), "active phase cancelled");
        self.observers
            .emit(Event::new(EventKind::ActivePhaseCompleted).with_state(state));
    }
}

fn log_completed(priority: Priority, state: &PhaseState) {
    match state.error() {
        Some(err) => tracing::warn!(
            phase = priority.as_label(),
            error = %err,
            label = err.as_label(),
            "phase failed"
        ),
        None => tracing::info!(
            phase = priority.as_label(),
            state = state.as_label(),
            "phase completed"
        ),
    }
}
