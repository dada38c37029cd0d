//! # Example: launch_active
//!
//! Wires platform foreground/background notifications to a [`Lifecycle`].
//!
//! Shows how to:
//! - Register `Launch` and `Active` initializers with dependencies
//! - Follow the lifecycle with a custom [`Observe`] implementation
//! - Re-run `Active` work on every foreground transition
//! - Cancel an in-flight `Active` cycle with a background transition
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► build Lifecycle (launch phase starts immediately)
//!   │     └─► config ─► storage
//!   │
//!   ├─► foreground()                     cycle #1
//!   │     └─► storage (skipped) ─► session ─► feed
//!   │
//!   ├─► foreground()                     cycle #2
//!   │     └─► feed starts a slow refresh
//!   ├─► background()                     cancels cycle #2
//!   │     └─► feed sees its token cancelled, returns Canceled
//!   │
//!   └─► shutdown()
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example launch_active
//! ```

use std::{sync::Arc, time::Duration};

use initvisor::{
    InitFn, InitId, InitRef, Lifecycle, LifecycleConfig, Observe, PhaseState, Priority, TaskError,
};
use tokio_util::sync::CancellationToken;

/// Prints every hook it receives.
struct Console;

impl Observe for Console {
    fn launch_phase_started(&self) {
        println!("[observer] launch started");
    }

    fn launch_phase_completed(&self, state: &PhaseState) {
        println!("[observer] launch completed: {state}");
    }

    fn active_phase_started(&self) {
        println!("[observer] active started");
    }

    fn active_phase_completed(&self, state: &PhaseState) {
        println!("[observer] active completed: {state}");
    }

    fn task_skipped(&self, id: &InitId) {
        println!("[observer]   skipped  {id}");
    }

    fn task_executed(&self, id: &InitId) {
        println!("[observer]   executed {id}");
    }

    fn task_failed(&self, id: &InitId, reason: &str) {
        println!("[observer]   failed   {id}: {reason}");
    }

    fn name(&self) -> &'static str {
        "console"
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("=== launch_active example ===\n");

    // 1. Configure runtime
    let mut cfg = LifecycleConfig::default();
    cfg.timeout = Duration::from_secs(5);

    // 2. Launch initializers: run once per process
    let config: InitRef = InitFn::arc("config", Priority::Launch, |_ctx: CancellationToken| async {
        println!("[config] loaded");
        Ok::<_, TaskError>(())
    });
    let storage: InitRef = InitFn::new("storage", Priority::Launch, |_ctx: CancellationToken| async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        println!("[storage] opened");
        Ok::<_, TaskError>(())
    })
    .with_dependencies(["config"])
    .into_ref();

    // 3. Active initializers: run on every foreground transition
    let session: InitRef = InitFn::new("session", Priority::Active, |_ctx: CancellationToken| async {
        println!("[session] refreshed");
        Ok::<_, TaskError>(())
    })
    .with_dependencies(["storage"])
    .into_ref();

    let cycles = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let feed: InitRef = {
        let cycles = Arc::clone(&cycles);
        InitFn::new("feed", Priority::Active, move |ctx: CancellationToken| {
            let n = cycles.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            async move {
                // The second refresh is slow enough to be interrupted.
                let delay = if n == 0 { 10 } else { 2_000 };
                tokio::select! {
                    _ = ctx.cancelled() => {
                        println!("[feed] refresh cancelled");
                        Err(TaskError::Canceled)
                    }
                    _ = tokio::time::sleep(Duration::from_millis(delay)) => {
                        println!("[feed] refreshed");
                        Ok(())
                    }
                }
            }
        })
        .with_dependencies(["session"])
        .into_ref()
    };

    // 4. Build: launch phase starts right away
    let lifecycle = Lifecycle::builder(cfg)
        .with_initializers(vec![config, storage, session, feed])
        .with_observers(vec![Arc::new(Console) as Arc<dyn Observe>])
        .build()?;

    let launch = lifecycle.wait_launch().await;
    println!("\n[app] launch: {launch}\n");

    // 5. First foreground: runs every Active initializer
    let mut active = lifecycle.subscribe_active();
    lifecycle.foreground().await?;
    let state = active.wait_for(PhaseState::is_terminal).await?.clone();
    println!("\n[app] cycle #1: {state}\n");

    // 6. Second foreground, interrupted by a background transition
    lifecycle.foreground().await?;
    tokio::time::sleep(Duration::from_millis(200)).await;
    lifecycle.background().await?;
    tokio::time::sleep(Duration::from_millis(50)).await;
    println!(
        "\n[app] cycle #2 after background: active={} composite={}\n",
        lifecycle.active_state(),
        lifecycle.state()
    );

    // 7. Stop: waits for in-flight work and drains observers
    lifecycle.shutdown().await?;

    println!("\n=== example completed successfully ===");
    Ok(())
}
