//! # ObserverSet: non-blocking fan-out over multiple observers
//!
//! [`ObserverSet`] distributes each [`Event`] to multiple observers **without
//! awaiting** their processing, so a slow observer never delays a phase.
//!
//! ## What it guarantees
//! - `emit(Event)` returns immediately.
//! - Per-observer FIFO (queue order).
//! - Panics inside observers are caught and logged (isolation).
//!
//! ## What it does **not** guarantee
//! - No global ordering across different observers.
//! - No retries on per-observer queue overflow (events are dropped for that
//!   observer).
//!
//! ## Diagram
//! ```text
//!    emit(Event)
//!        │                        (Arc-clone per observer)
//!        ├────────────────► [queue O1] ─► worker O1 ─► on_event()
//!        ├────────────────► [queue O2] ─► worker O2 ─► on_event()
//!        └────────────────► [queue ON] ─► worker ON ─► on_event()
//! ```

use std::sync::{Arc, Mutex};

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::Event;

use super::Observe;

/// Per-observer channel with metadata.
struct ObserverChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Composite fan-out with per-observer bounded queues and worker tasks.
pub struct ObserverSet {
    channels: Mutex<Vec<ObserverChannel>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl ObserverSet {
    /// Creates a new set and spawns one worker per observer.
    ///
    /// `default_capacity` is used for observers whose
    /// [`queue_capacity`](Observe::queue_capacity) is `None`.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(observers: Vec<Arc<dyn Observe>>, default_capacity: usize) -> Self {
        let mut channels = Vec::with_capacity(observers.len());
        let mut workers = Vec::with_capacity(observers.len());

        for obs in observers {
            let cap = obs.queue_capacity().unwrap_or(default_capacity).max(1);
            let name = obs.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(cap);

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = obs.on_event(ev.as_ref());
                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        tracing::error!(
                            observer = obs.name(),
                            panic = ?panic_err,
                            "observer panicked"
                        );
                    }
                }
            });

            channels.push(ObserverChannel { name, sender: tx });
            workers.push(handle);
        }

        Self {
            channels: Mutex::new(channels),
            workers: Mutex::new(workers),
        }
    }

    /// Fan-out one event to all observers (non-blocking).
    ///
    /// If an observer's queue is **full** or **closed**, the event is dropped for it
    /// and a warning is logged with the observer's name.
    pub fn emit(&self, event: Event) {
        let channels = self.channels.lock().unwrap_or_else(|p| p.into_inner());
        if channels.is_empty() {
            return;
        }
        let ev = Arc::new(event);
        for channel in channels.iter() {
            match channel.sender.try_send(Arc::clone(&ev)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(
                        observer = channel.name,
                        kind = ?ev.kind,
                        "observer dropped event: queue full"
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    tracing::warn!(
                        observer = channel.name,
                        kind = ?ev.kind,
                        "observer dropped event: worker closed"
                    );
                }
            }
        }
    }

    /// Graceful shutdown: close all queues and await worker completion.
    ///
    /// Events already queued are still delivered. Events emitted afterwards are discarded.
    pub async fn shutdown(&self) {
        drop(std::mem::take(
            &mut *self.channels.lock().unwrap_or_else(|p| p.into_inner()),
        ));
        let workers = std::mem::take(&mut *self.workers.lock().unwrap_or_else(|p| p.into_inner()));
        for h in workers {
            let _ = h.await;
        }
    }

    /// True if there are no observers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.lock().unwrap_or_else(|p| p.into_inner()).len()
    }
}
