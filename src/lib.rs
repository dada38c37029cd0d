//! # initvisor
//!
//! **initvisor** runs an application's startup initializers in dependency
//! order, at two moments of its lifecycle: once when the process starts
//! (*launch*) and again every time the application returns to the foreground
//! (*active*).
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ Initializer  │   │ Initializer  │   │ Initializer  │
//!     │ id, priority │   │ id, priority │   │ id, priority │
//!     │ dependencies │   │ dependencies │   │ dependencies │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Lifecycle (handle) ──► Coordinator (actor, serializes triggers)  │
//! │  - Registry (ordered, indexed by InitId)                          │
//! │  - CompletedSet (ids that already ran)                            │
//! │  - StateStore (launch / active / composite watch channels)        │
//! │  - ObserverSet (fans out to user observers)                       │
//! └──────┬─────────────────────────────────────────┬──────────────────┘
//!        ▼ once, at build                          ▼ every foreground()
//!     launch sequence                           active sequence
//!        │                                         │ waits for launch
//!        └──────────────► PhaseRun ◄───────────────┘ evicts Active ids
//!                            │  one initializer at a time
//!                            ▼
//!                         Resolver ─► dependencies first ─► run_once
//! ```
//!
//! ### Active cycle
//! ```text
//! foreground() ─► cancel in-flight cycle ─► new cycle (after previous task ends)
//!   ├─► active = Pending
//!   ├─► wait until launch is Complete | Failed
//!   │     └─ Failed ─► active = launch failure, stop
//!   ├─► ActivePhaseStarted, evict Active ids from the completed set
//!   ├─► run every Active initializer (and its dependency closure)
//!   │     ├─ checkpoint before each initializer and before each run
//!   │     └─ first error aborts the phase
//!   └─► active = Complete | Failed(e), ActivePhaseCompleted(active)
//!
//! background() ─► cancel in-flight cycle, ActivePhaseCompleted(current state)
//! ```
//!
//! ## Features
//! | Area              | Description                                                | Key types / traits                        |
//! |-------------------|------------------------------------------------------------|-------------------------------------------|
//! | **Initializers**  | Define startup work as functions or trait impls.           | [`Initializer`], [`InitFn`], [`InitRef`]  |
//! | **Lifecycle**     | Launch once, re-run active work on every foreground.       | [`Lifecycle`], [`LifecycleBuilder`]       |
//! | **State**         | Per-phase and composite state streams.                     | [`PhaseState`], [`StateStore`]            |
//! | **Observers**     | Hook into phase and task events.                           | [`Observe`], [`ObserverSet`], [`Event`]   |
//! | **Errors**        | Typed errors for resolution, runs and triggers.            | [`InitError`], [`TaskError`]              |
//! | **Configuration** | Centralize runtime settings.                               | [`LifecycleConfig`]                       |
//!
//! ## Optional features
//! - `logging`: exports the `tracing`-backed `LogWriter` observer.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use initvisor::{InitFn, InitRef, Lifecycle, LifecycleConfig, PhaseState, Priority, TaskError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = LifecycleConfig::default();
//!     cfg.timeout = Duration::from_secs(10);
//!
//!     let storage: InitRef = InitFn::arc("storage", Priority::Launch, |_ctx: CancellationToken| async {
//!         Ok::<_, TaskError>(())
//!     });
//!     let refresh: InitRef = InitFn::new("refresh", Priority::Active, |ctx: CancellationToken| async move {
//!         if ctx.is_cancelled() {
//!             return Err(TaskError::Canceled);
//!         }
//!         Ok(())
//!     })
//!     .with_dependencies(["storage"])
//!     .into_ref();
//!
//!     let lifecycle = Lifecycle::builder(cfg)
//!         .with_initializers(vec![storage, refresh])
//!         .build()?;
//!
//!     let mut active = lifecycle.subscribe_active();
//!     lifecycle.foreground().await?;
//!     active.wait_for(PhaseState::is_terminal).await?;
//!
//!     lifecycle.shutdown().await?;
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod observers;
mod state;
mod tasks;

// ---- Public re-exports ----

pub use crate::core::{Lifecycle, LifecycleBuilder, LifecycleConfig};
pub use error::{BuildError, InitError, TaskError, TriggerError};
pub use events::{Event, EventKind};
pub use observers::{Observe, ObserverSet, dispatch};
pub use state::{PhaseState, StateStore};
pub use tasks::{InitFn, InitId, InitRef, Initializer, Priority};

// Optional: expose a tracing-backed logger observer.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use observers::LogWriter;
