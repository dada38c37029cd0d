//! # Lifecycle observers.
//!
//! This module provides the [`Observe`] trait and the [`ObserverSet`] fan-out
//! that delivers lifecycle events to every registered observer.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   launch/active sequence ─┐
//!   resolver ───────────────┴─ emit(Event) ──► ObserverSet ──► per-observer worker
//!                                                                   │
//!                                                    ┌──────────────┼──────────────┐
//!                                                    ▼              ▼              ▼
//!                                               LogWriter       Analytics       Custom
//! ```

mod observer;
mod set;

#[cfg(feature = "logging")]
mod log;

pub use observer::{Observe, dispatch};
pub use set::ObserverSet;

#[cfg(feature = "logging")]
pub use log::LogWriter;
