//! # Initializer abstractions.
//!
//! This module provides the descriptor types:
//! - [`InitId`] - stable identity used for registry lookups and dependency matching
//! - [`Initializer`] - trait for implementing async cancelable startup work
//! - [`Priority`] - phase class (`Launch` or `Active`)
//! - [`InitFn`] - function-backed initializer
//! - [`InitRef`] - shared reference to an initializer (`Arc<dyn Initializer>`)

mod id;
mod init;
mod init_fn;

pub use id::InitId;
pub use init::{Initializer, Priority};
pub use init_fn::{InitFn, InitRef};
