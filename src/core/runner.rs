//! # Run a single initializer.
//!
//! Executes the run operation of one [`Initializer`] with an optional timeout.
//!
//! ## Rules
//! - Derives a **child token** per run; the parent (phase) token is never cancelled from here.
//! - On timeout the child token is cancelled so the run can notice, and
//!   [`TaskError::Timeout`] is returned.
//! - A panic inside the run is caught and reported as [`TaskError::Fail`].
//! - Phase cancellation is **not** applied here: an in-flight run always goes
//!   to its own completion.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::{error::TaskError, tasks::Initializer};

pub(crate) async fn run_once<T: Initializer + ?Sized>(
    init: &T,
    parent: &CancellationToken,
    timeout: Option<Duration>,
) -> Result<(), TaskError> {
    let child = parent.child_token();
    let run = AssertUnwindSafe(init.run(child.clone()))
        .catch_unwind()
        .map(|res| res.unwrap_or_else(|payload| Err(panic_error(payload))));

    if let Some(dur) = timeout.filter(|d| *d > Duration::ZERO) {
        match time::timeout(dur, run).await {
            Ok(r) => r,
            Err(_elapsed) => {
                child.cancel();
                Err(TaskError::Timeout { timeout: dur })
            }
        }
    } else {
        run.await
    }
}

fn panic_error(payload: Box<dyn Any + Send>) -> TaskError {
    let msg = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    TaskError::fail(format!("panicked: {msg}"))
}
