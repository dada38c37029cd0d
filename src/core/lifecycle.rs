//! # Lifecycle: the public handle.
//!
//! [`Lifecycle`] is a cheap, cloneable handle to a running coordinator. It
//! forwards platform transitions as triggers and exposes the phase states.
//!
//! ## Key responsibilities
//! - start the launch phase exactly once (at [`LifecycleBuilder::build`])
//! - re-run every `Active` initializer on each [`foreground`](Lifecycle::foreground)
//! - cancel the in-flight active cycle on [`background`](Lifecycle::background)
//! - expose launch / active / composite state snapshots and watch streams
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use initvisor::{InitFn, Lifecycle, LifecycleConfig, PhaseState, Priority, TaskError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = InitFn::arc("config", Priority::Launch, |_ctx: CancellationToken| async {
//!         Ok::<_, TaskError>(())
//!     });
//!     let session = InitFn::new("session", Priority::Active, |_ctx: CancellationToken| async {
//!         Ok::<_, TaskError>(())
//!     })
//!     .with_dependencies(["config"])
//!     .into_ref();
//!
//!     let lifecycle = Lifecycle::builder(LifecycleConfig::default())
//!         .with_initializers(vec![config, session])
//!         .build()?;
//!
//!     assert_eq!(lifecycle.wait_launch().await, PhaseState::Complete);
//!
//!     // Wire these to the platform's foreground/background notifications.
//!     lifecycle.foreground().await?;
//!     lifecycle.background().await?;
//!
//!     lifecycle.shutdown().await?;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};

use super::{
    builder::LifecycleBuilder,
    config::LifecycleConfig,
    coordinator::Command,
    sequence::Shared,
};
use crate::error::TriggerError;
use crate::state::PhaseState;

/// Handle to a running lifecycle coordinator.
#[derive(Clone)]
pub struct Lifecycle {
    tx: mpsc::Sender<Command>,
    shared: Arc<Shared>,
}

impl Lifecycle {
    /// Returns a builder with the given configuration.
    pub fn builder(cfg: LifecycleConfig) -> LifecycleBuilder {
        LifecycleBuilder::new(cfg)
    }

    pub(crate) fn new(tx: mpsc::Sender<Command>, shared: Arc<Shared>) -> Self {
        Self { tx, shared }
    }

    /// Reports a foreground/active transition: starts (or restarts) the active cycle.
    ///
    /// Waits for queue space; returns once the trigger is queued, not when the cycle ends.
    pub async fn foreground(&self) -> Result<(), TriggerError> {
        self.send(Command::Foreground).await
    }

    /// Reports a background/inactive transition: cancels the in-flight active cycle.
    pub async fn background(&self) -> Result<(), TriggerError> {
        self.send(Command::Background).await
    }

    /// Non-blocking variant of [`Lifecycle::foreground`].
    pub fn try_foreground(&self) -> Result<(), TriggerError> {
        self.try_send(Command::Foreground)
    }

    /// Non-blocking variant of [`Lifecycle::background`].
    pub fn try_background(&self) -> Result<(), TriggerError> {
        self.try_send(Command::Background)
    }

    /// Stops the coordinator.
    ///
    /// Cancels the in-flight active cycle, waits for in-flight phases (launch is
    /// never interrupted) and drains observer queues. Later triggers return
    /// [`TriggerError::Closed`].
    pub async fn shutdown(&self) -> Result<(), TriggerError> {
        let (ack, done) = oneshot::channel();
        self.send(Command::Shutdown(ack)).await?;
        done.await.map_err(|_| TriggerError::Closed)
    }

    /// Waits until the launch phase is `Complete` or `Failed` and returns that state.
    pub async fn wait_launch(&self) -> PhaseState {
        let mut rx = self.shared.store.subscribe_launch();
        let res = rx.wait_for(PhaseState::is_terminal).await.map(|s| s.clone());
        res.unwrap_or_else(|_| self.shared.store.launch())
    }

    pub fn launch_state(&self) -> PhaseState {
        self.shared.store.launch()
    }

    pub fn active_state(&self) -> PhaseState {
        self.shared.store.active()
    }

    /// Composite of the two phases.
    pub fn state(&self) -> PhaseState {
        self.shared.store.composite()
    }

    pub fn subscribe_launch(&self) -> watch::Receiver<PhaseState> {
        self.shared.store.subscribe_launch()
    }

    pub fn subscribe_active(&self) -> watch::Receiver<PhaseState> {
        self.shared.store.subscribe_active()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<PhaseState> {
        self.shared.store.subscribe_composite()
    }

    async fn send(&self, cmd: Command) -> Result<(), TriggerError> {
        self.tx.send(cmd).await.map_err(|_| TriggerError::Closed)
    }

    fn try_send(&self, cmd: Command) -> Result<(), TriggerError> {
        self.tx.try_send(cmd).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => TriggerError::Full,
            mpsc::error::TrySendError::Closed(_) => TriggerError::Closed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resolver::tests::{Log, failing, ran, recording};
    use crate::error::{InitError, TaskError};
    use crate::events::{Event, EventKind};
    use crate::observers::Observe;
    use crate::tasks::{InitFn, InitId, InitRef, Priority};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Notify;
    use tokio_util::sync::CancellationToken;

    const WAIT: Duration = Duration::from_secs(5);

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<(EventKind, Option<String>, Option<PhaseState>)>>,
    }

    #[async_trait]
    impl Observe for Recorder {
        async fn on_event(&self, ev: &Event) {
            self.events.lock().unwrap().push((
                ev.kind,
                ev.init.as_ref().map(InitId::to_string),
                ev.state.clone(),
            ));
        }
    }

    impl Recorder {
        fn kinds(&self) -> Vec<EventKind> {
            self.events.lock().unwrap().iter().map(|e| e.0).collect()
        }

        fn active_completed(&self) -> Vec<Option<PhaseState>> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.0 == EventKind::ActivePhaseCompleted)
                .map(|e| e.2.clone())
                .collect()
        }

        fn skipped(&self) -> Vec<String> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.0 == EventKind::TaskSkipped)
                .filter_map(|e| e.1.clone())
                .collect()
        }
    }

    fn build(inits: Vec<InitRef>) -> (Lifecycle, Arc<Recorder>) {
        let rec = Arc::new(Recorder::default());
        let lifecycle = Lifecycle::builder(LifecycleConfig::default())
            .with_initializers(inits)
            .with_observers(vec![rec.clone() as Arc<dyn Observe>])
            .build()
            .unwrap();
        (lifecycle, rec)
    }

    /// Waits for the next terminal value sent after `rx` was last marked seen.
    async fn next_terminal(rx: &mut watch::Receiver<PhaseState>) -> PhaseState {
        tokio::time::timeout(WAIT, async {
            loop {
                rx.changed().await.expect("store dropped");
                let state = rx.borrow_and_update().clone();
                if state.is_terminal() {
                    return state;
                }
            }
        })
        .await
        .expect("no terminal state")
    }

    async fn run_cycle(lifecycle: &Lifecycle) -> PhaseState {
        let mut rx = lifecycle.subscribe_active();
        lifecycle.foreground().await.unwrap();
        next_terminal(&mut rx).await
    }

    #[tokio::test]
    async fn test_launch_runs_once_at_build() {
        let log = Log::default();
        let (lifecycle, rec) = build(vec![
            recording("b", Priority::Launch, &["a"], &log),
            recording("a", Priority::Launch, &[], &log),
            recording("x", Priority::Active, &[], &log),
        ]);

        let state = tokio::time::timeout(WAIT, lifecycle.wait_launch()).await.unwrap();
        assert_eq!(state, PhaseState::Complete);
        assert_eq!(ran(&log), vec!["a", "b"]);
        assert_eq!(lifecycle.active_state(), PhaseState::Pending);
        assert_eq!(lifecycle.state(), PhaseState::Pending);

        lifecycle.shutdown().await.unwrap();
        assert_eq!(
            rec.kinds(),
            vec![
                EventKind::LaunchPhaseStarted,
                EventKind::TaskExecuted,
                EventKind::TaskExecuted,
                EventKind::TaskSkipped,
                EventKind::LaunchPhaseCompleted,
            ]
        );
        assert_eq!(rec.skipped(), vec!["a"]);
    }

    #[tokio::test]
    async fn test_active_cycle_completes_composite() {
        let log = Log::default();
        let (lifecycle, _rec) = build(vec![
            recording("boot", Priority::Launch, &[], &log),
            recording("sync", Priority::Active, &["boot"], &log),
        ]);

        assert_eq!(run_cycle(&lifecycle).await, PhaseState::Complete);
        assert_eq!(lifecycle.launch_state(), PhaseState::Complete);
        assert_eq!(lifecycle.state(), PhaseState::Complete);
        assert_eq!(ran(&log), vec!["boot", "sync"]);
        lifecycle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_active_waits_for_slow_launch() {
        let log = Log::default();
        let gate = Arc::new(Notify::new());
        let slow = {
            let gate = Arc::clone(&gate);
            let log = Log::clone(&log);
            InitFn::arc("slow", Priority::Launch, move |_ctx: CancellationToken| {
                let gate = Arc::clone(&gate);
                let log = Log::clone(&log);
                async move {
                    gate.notified().await;
                    log.lock().unwrap().push("slow".to_string());
                    Ok::<_, TaskError>(())
                }
            })
        };
        let (lifecycle, _rec) = build(vec![slow, recording("fast", Priority::Active, &[], &log)]);

        let mut rx = lifecycle.subscribe_active();
        lifecycle.foreground().await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(ran(&log).is_empty());

        gate.notify_one();
        assert_eq!(next_terminal(&mut rx).await, PhaseState::Complete);
        assert_eq!(ran(&log), vec!["slow", "fast"]);
        lifecycle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_launch_failure_is_copied_into_active() {
        let log = Log::default();
        let (lifecycle, rec) = build(vec![
            failing("boot", Priority::Launch, &[], &log),
            recording("later", Priority::Launch, &[], &log),
            recording("sync", Priority::Active, &[], &log),
        ]);

        let launch = tokio::time::timeout(WAIT, lifecycle.wait_launch()).await.unwrap();
        assert!(launch.is_failed());
        assert!(matches!(
            launch.error(),
            Some(InitError::TaskFailed { id, .. }) if id.as_str() == "boot"
        ));

        let active = run_cycle(&lifecycle).await;
        assert!(active.is_failed());
        assert_eq!(active.error().map(|e| e.id().as_str()), Some("boot"));
        assert!(lifecycle.state().is_failed());
        assert_eq!(ran(&log), vec!["boot"]);

        lifecycle.shutdown().await.unwrap();
        assert!(!rec.kinds().contains(&EventKind::ActivePhaseStarted));
        assert!(rec.kinds().contains(&EventKind::TaskFailed));
    }

    #[tokio::test]
    async fn test_each_cycle_reruns_active_but_not_launch() {
        let log = Log::default();
        let (lifecycle, rec) = build(vec![
            recording("boot", Priority::Launch, &[], &log),
            recording("token", Priority::Active, &["boot"], &log),
            recording("feed", Priority::Active, &["token"], &log),
        ]);

        assert_eq!(run_cycle(&lifecycle).await, PhaseState::Complete);
        assert_eq!(run_cycle(&lifecycle).await, PhaseState::Complete);
        assert_eq!(
            ran(&log),
            vec!["boot", "token", "feed", "token", "feed"]
        );

        lifecycle.shutdown().await.unwrap();
        // `boot` is reached through `token` each cycle; `token` through `feed`.
        assert_eq!(rec.skipped(), vec!["boot", "token", "boot", "token"]);
    }

    #[tokio::test]
    async fn test_active_failure_reruns_next_cycle() {
        let log = Log::default();
        let attempts = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let flaky = {
            let attempts = Arc::clone(&attempts);
            InitFn::arc("flaky", Priority::Active, move |_ctx: CancellationToken| {
                let n = attempts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(TaskError::fail("offline"))
                    } else {
                        Ok(())
                    }
                }
            })
        };
        let (lifecycle, _rec) = build(vec![flaky, recording("after", Priority::Active, &[], &log)]);

        let first = run_cycle(&lifecycle).await;
        assert!(first.is_failed());
        assert!(ran(&log).is_empty());

        assert_eq!(run_cycle(&lifecycle).await, PhaseState::Complete);
        assert_eq!(ran(&log), vec!["after"]);
        assert_eq!(lifecycle.state(), PhaseState::Complete);
        lifecycle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_background_cancels_between_initializers() {
        let log = Log::default();
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let blocking = {
            let entered = Arc::clone(&entered);
            let release = Arc::clone(&release);
            let log = Log::clone(&log);
            InitFn::arc("blocking", Priority::Active, move |_ctx: CancellationToken| {
                let entered = Arc::clone(&entered);
                let release = Arc::clone(&release);
                let log = Log::clone(&log);
                async move {
                    entered.notify_one();
                    release.notified().await;
                    log.lock().unwrap().push("blocking".to_string());
                    Ok::<_, TaskError>(())
                }
            })
        };
        let (lifecycle, rec) = build(vec![blocking, recording("next", Priority::Active, &[], &log)]);

        lifecycle.foreground().await.unwrap();
        tokio::time::timeout(WAIT, entered.notified()).await.unwrap();

        lifecycle.background().await.unwrap();
        // The in-flight run is not aborted; let it finish.
        tokio::time::sleep(Duration::from_millis(20)).await;
        release.notify_one();
        lifecycle.shutdown().await.unwrap();

        assert_eq!(ran(&log), vec!["blocking"]);
        // Cancelled cycle leaves the active state where it was.
        assert_eq!(lifecycle.active_state(), PhaseState::Pending);
        assert_eq!(rec.active_completed(), vec![Some(PhaseState::Pending)]);
    }

    #[tokio::test]
    async fn test_background_with_token_honouring_run_keeps_pending() {
        let log = Log::default();
        let entered = Arc::new(Notify::new());
        let coop = {
            let entered = Arc::clone(&entered);
            InitFn::arc("coop", Priority::Active, move |ctx: CancellationToken| {
                let entered = Arc::clone(&entered);
                async move {
                    entered.notify_one();
                    ctx.cancelled().await;
                    Err(TaskError::Canceled)
                }
            })
        };
        let (lifecycle, rec) = build(vec![coop, recording("next", Priority::Active, &[], &log)]);

        lifecycle.foreground().await.unwrap();
        tokio::time::timeout(WAIT, entered.notified()).await.unwrap();
        lifecycle.background().await.unwrap();
        lifecycle.shutdown().await.unwrap();

        assert!(ran(&log).is_empty());
        assert_eq!(lifecycle.active_state(), PhaseState::Pending);
        assert_eq!(lifecycle.state(), PhaseState::Pending);
        assert_eq!(rec.active_completed(), vec![Some(PhaseState::Pending)]);
        assert!(!rec.kinds().contains(&EventKind::TaskFailed));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_second_foreground_cancels_and_chains_after_first() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let runs = Arc::new(AtomicUsize::new(0));
        let blocking = {
            let (entered, release) = (Arc::clone(&entered), Arc::clone(&release));
            let (in_flight, peak, runs) =
                (Arc::clone(&in_flight), Arc::clone(&peak), Arc::clone(&runs));
            InitFn::arc("blocking", Priority::Active, move |_ctx: CancellationToken| {
                let (entered, release) = (Arc::clone(&entered), Arc::clone(&release));
                let (in_flight, peak, runs) =
                    (Arc::clone(&in_flight), Arc::clone(&peak), Arc::clone(&runs));
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    entered.notify_one();
                    release.notified().await;
                    runs.fetch_add(1, Ordering::SeqCst);
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Ok::<_, TaskError>(())
                }
            })
        };
        let (lifecycle, rec) = build(vec![blocking]);

        lifecycle.foreground().await.unwrap();
        tokio::time::timeout(WAIT, entered.notified()).await.unwrap();

        let mut rx = lifecycle.subscribe_active();
        lifecycle.foreground().await.unwrap();
        // Give the second cycle a chance to (wrongly) start its own run.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(in_flight.load(Ordering::SeqCst), 1);

        release.notify_one();
        tokio::time::timeout(WAIT, entered.notified()).await.unwrap();
        release.notify_one();

        assert_eq!(next_terminal(&mut rx).await, PhaseState::Complete);
        lifecycle.shutdown().await.unwrap();

        assert_eq!(runs.load(Ordering::SeqCst), 2);
        assert_eq!(peak.load(Ordering::SeqCst), 1);
        assert_eq!(
            rec.active_completed(),
            vec![Some(PhaseState::Pending), Some(PhaseState::Complete)]
        );
    }

    #[tokio::test]
    async fn test_background_while_waiting_for_launch_skips_active_phase() {
        let log = Log::default();
        let gate = Arc::new(Notify::new());
        let slow = {
            let gate = Arc::clone(&gate);
            InitFn::arc("slow", Priority::Launch, move |_ctx: CancellationToken| {
                let gate = Arc::clone(&gate);
                async move {
                    gate.notified().await;
                    Ok::<_, TaskError>(())
                }
            })
        };
        let (lifecycle, rec) = build(vec![slow, recording("sync", Priority::Active, &[], &log)]);

        lifecycle.foreground().await.unwrap();
        lifecycle.background().await.unwrap();
        gate.notify_one();
        assert_eq!(
            tokio::time::timeout(WAIT, lifecycle.wait_launch()).await.unwrap(),
            PhaseState::Complete
        );
        lifecycle.shutdown().await.unwrap();

        assert!(ran(&log).is_empty());
        assert_eq!(lifecycle.active_state(), PhaseState::Pending);
        assert!(!rec.kinds().contains(&EventKind::ActivePhaseStarted));
        assert_eq!(rec.active_completed(), vec![Some(PhaseState::Pending)]);
    }

    #[tokio::test]
    async fn test_background_after_completed_cycle_reports_nothing() {
        let log = Log::default();
        let (lifecycle, rec) = build(vec![recording("sync", Priority::Active, &[], &log)]);

        assert_eq!(run_cycle(&lifecycle).await, PhaseState::Complete);
        // The cycle task may not have returned yet; it already settled.
        lifecycle.background().await.unwrap();
        lifecycle.shutdown().await.unwrap();

        assert_eq!(lifecycle.active_state(), PhaseState::Complete);
        assert_eq!(rec.active_completed(), vec![Some(PhaseState::Complete)]);
    }

    #[tokio::test]
    async fn test_background_without_cycle_is_noop() {
        let (lifecycle, rec) = build(vec![]);
        assert_eq!(lifecycle.wait_launch().await, PhaseState::Complete);

        lifecycle.background().await.unwrap();
        lifecycle.shutdown().await.unwrap();
        assert!(!rec.kinds().contains(&EventKind::ActivePhaseCompleted));
    }

    #[tokio::test]
    async fn test_cycle_after_cancel_runs_everything_again() {
        let log = Log::default();
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let blocking = {
            let entered = Arc::clone(&entered);
            let release = Arc::clone(&release);
            let log = Log::clone(&log);
            InitFn::arc("blocking", Priority::Active, move |_ctx: CancellationToken| {
                let entered = Arc::clone(&entered);
                let release = Arc::clone(&release);
                let log = Log::clone(&log);
                async move {
                    entered.notify_one();
                    release.notified().await;
                    log.lock().unwrap().push("blocking".to_string());
                    Ok::<_, TaskError>(())
                }
            })
        };
        let (lifecycle, _rec) =
            build(vec![blocking, recording("next", Priority::Active, &[], &log)]);

        lifecycle.foreground().await.unwrap();
        tokio::time::timeout(WAIT, entered.notified()).await.unwrap();
        lifecycle.background().await.unwrap();

        let mut rx = lifecycle.subscribe_active();
        lifecycle.foreground().await.unwrap();
        // First release finishes the cancelled run, second the new cycle's run.
        release.notify_one();
        tokio::time::timeout(WAIT, entered.notified()).await.unwrap();
        release.notify_one();

        assert_eq!(next_terminal(&mut rx).await, PhaseState::Complete);
        assert_eq!(ran(&log), vec!["blocking", "blocking", "next"]);
        lifecycle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_dependency_fails_launch() {
        let log = Log::default();
        let (lifecycle, _rec) = build(vec![recording("a", Priority::Launch, &["nope"], &log)]);

        let state = tokio::time::timeout(WAIT, lifecycle.wait_launch()).await.unwrap();
        match state.error() {
            Some(InitError::MissingDependency { id, .. }) => assert_eq!(id.as_str(), "nope"),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(ran(&log).is_empty());
        lifecycle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_triggers_after_shutdown_are_rejected() {
        let (lifecycle, _rec) = build(vec![]);
        lifecycle.shutdown().await.unwrap();

        assert_eq!(lifecycle.foreground().await, Err(TriggerError::Closed));
        assert_eq!(lifecycle.try_background(), Err(TriggerError::Closed));
    }

    #[tokio::test]
    async fn test_duplicate_ids_fail_build() {
        let log = Log::default();
        let res = Lifecycle::builder(LifecycleConfig::default())
            .with_initializer(recording("a", Priority::Launch, &[], &log))
            .with_initializer(recording("a", Priority::Active, &[], &log))
            .build();
        assert!(matches!(
            res,
            Err(crate::error::BuildError::DuplicateInitializer { .. })
        ));
    }
}
