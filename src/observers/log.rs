//! # LogWriter — tracing-backed event writer
//!
//! A minimal observer that writes every lifecycle [`Event`] through `tracing`.
//! Install any `tracing` subscriber to see the output.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO initvisor: launch phase started
//! INFO initvisor: task executed init=logger
//! INFO initvisor: task skipped init=logger
//! WARN initvisor: task failed init=db reason="execution failed: refused"
//! INFO initvisor: launch phase completed state=failed
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::observers::Observe;

/// Event writer observer.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Observe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let init = e.init.as_ref().map(|id| id.as_str()).unwrap_or("-");
        let state = e.state.as_ref().map(|s| s.as_label()).unwrap_or("-");
        match e.kind {
            EventKind::LaunchPhaseStarted => {
                tracing::info!(target: "initvisor", seq = e.seq, "launch phase started");
            }
            EventKind::LaunchPhaseCompleted => {
                tracing::info!(target: "initvisor", seq = e.seq, state, "launch phase completed");
            }
            EventKind::ActivePhaseStarted => {
                tracing::info!(target: "initvisor", seq = e.seq, "active phase started");
            }
            EventKind::ActivePhaseCompleted => {
                tracing::info!(target: "initvisor", seq = e.seq, state, "active phase completed");
            }
            EventKind::TaskSkipped => {
                tracing::info!(target: "initvisor", seq = e.seq, init, "task skipped");
            }
            EventKind::TaskExecuted => {
                tracing::info!(target: "initvisor", seq = e.seq, init, "task executed");
            }
            EventKind::TaskFailed => {
                tracing::warn!(
                    target: "initvisor",
                    seq = e.seq,
                    init,
                    reason = e.reason.as_deref().unwrap_or("unknown"),
                    "task failed"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
