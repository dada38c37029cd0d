//! # Coordinator: serializes lifecycle triggers.
//!
//! One tokio task owns the in-flight launch and active work and receives
//! every trigger over a bounded channel, so overlapping foreground/background
//! notifications are handled strictly one after another.
//!
//! ```text
//! Lifecycle::foreground() ─┐
//! Lifecycle::background() ─┼─► mpsc<Command> ─► Coordinator::run()
//! Lifecycle::shutdown() ───┘                        │
//!                                                   ├─ Foreground → cancel in-flight cycle,
//!                                                   │               spawn new cycle chained after it
//!                                                   ├─ Background → cancel in-flight cycle,
//!                                                   │               ActivePhaseCompleted(current)
//!                                                   └─ Shutdown   → cancel, join launch + cycle,
//!                                                                   drain observers, ack
//! ```
//!
//! A new active cycle awaits the previous cycle's task before evaluating
//! anything, so two cycles never run their phase loops at the same time.

use std::sync::Arc;

use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

use crate::core::sequence::{Cycle, Shared};

/// Messages accepted by the coordinator.
#[derive(Debug)]
pub(crate) enum Command {
    Foreground,
    Background,
    Shutdown(oneshot::Sender<()>),
}

/// An active cycle that may still be in flight.
struct ActiveCycle {
    cycle: Arc<Cycle>,
    handle: JoinHandle<()>,
}

pub(crate) struct Coordinator {
    shared: Arc<Shared>,
    launch: Option<JoinHandle<()>>,
    active: Option<ActiveCycle>,
}

impl Coordinator {
    /// Starts the launch sequence and the coordinator loop.
    pub fn spawn(shared: Arc<Shared>, rx: mpsc::Receiver<Command>) {
        let launch = {
            let shared = Arc::clone(&shared);
            tokio::spawn(async move { shared.launch().await })
        };
        let coordinator = Self {
            shared,
            launch: Some(launch),
            active: None,
        };
        tokio::spawn(coordinator.run(rx));
    }

    async fn run(mut self, mut rx: mpsc::Receiver<Command>) {
        while let Some(cmd) = rx.recv().await {
            tracing::debug!(?cmd, "trigger received");
            match cmd {
                Command::Foreground => self.on_foreground(),
                Command::Background => self.cancel_active(),
                Command::Shutdown(ack) => {
                    self.shutdown().await;
                    let _ = ack.send(());
                    return;
                }
            }
        }
        // Every handle dropped.
        self.shutdown().await;
    }

    fn on_foreground(&mut self) {
        self.cancel_active();
        let previous = self.active.take().map(|cycle| cycle.handle);

        let cycle = Arc::new(Cycle::new());
        let shared = Arc::clone(&self.shared);
        let handle = {
            let cycle = Arc::clone(&cycle);
            tokio::spawn(async move {
                if let Some(previous) = previous {
                    let _ = previous.await;
                }
                shared.active(&cycle).await;
            })
        };
        self.active = Some(ActiveCycle { cycle, handle });
    }

    /// Requests cancellation of the in-flight active cycle, if any.
    ///
    /// A cycle that already settled (or was cancelled before) is left alone.
    fn cancel_active(&self) {
        let Some(active) = &self.active else {
            return;
        };
        if active.cycle.cancel() {
            self.shared.report_active_cancelled();
        }
    }

    async fn shutdown(&mut self) {
        self.cancel_active();
        if let Some(cycle) = self.active.take() {
            let _ = cycle.handle.await;
        }
        if let Some(launch) = self.launch.take() {
            let _ = launch.await;
        }
        self.shared.observers.shutdown().await;
        tracing::debug!("coordinator stopped");
    }
}
