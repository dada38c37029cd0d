//! Lifecycle events.
//!
//! This module groups the event **data model** emitted by the lifecycle
//! coordinator, the phase executor and the resolver.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//!
//! ## Quick reference
//! - **Publishers**: launch/active sequences (phase events), resolver (task events).
//! - **Consumers**: [`ObserverSet`](crate::ObserverSet), which fans out to every
//!   registered [`Observe`](crate::Observe) implementation.

mod event;

pub use event::{Event, EventKind};
