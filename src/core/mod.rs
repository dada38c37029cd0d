//! Runtime core: scheduling and lifecycle.
//!
//! The public API from this module is [`Lifecycle`] (with its builder and
//! config). Everything else is internal.
//!
//! Internal modules:
//! - [`registry`]: ordered, id-indexed initializers;
//! - [`completed`]: ids that already ran in this process;
//! - [`runner`]: one run operation with timeout and panic isolation;
//! - [`resolver`]: dependency closure resolution with cycle/missing detection;
//! - [`phase`]: sequential execution of one priority class;
//! - [`sequence`]: launch and active sequences over the shared state;
//! - [`coordinator`]: actor that serializes foreground/background triggers.
//!
//! ## Call chain
//! ```text
//! Lifecycle ─► Coordinator ─► sequence (launch / active) ─► PhaseRun ─► Resolver ─► run_once
//!                                   │
//!                                   └─► StateStore (launch / active / composite)
//! ```

mod builder;
mod completed;
mod config;
mod coordinator;
mod lifecycle;
mod phase;
mod registry;
mod resolver;
mod runner;
mod sequence;

pub use builder::LifecycleBuilder;
pub use config::LifecycleConfig;
pub use lifecycle::Lifecycle;
