//! Phase states and the store that broadcasts them.
//!
//! ## Contents
//! - [`PhaseState`] `Pending | Complete | Failed(error)` with coarse equality
//! - [`StateStore`] launch / active / composite watch channels

mod phase;
mod store;

pub use phase::PhaseState;
pub use store::StateStore;
