//! # Lifecycle configuration.
//!
//! Provides [`LifecycleConfig`] centralized settings for the lifecycle runtime.
//!
//! ## Sentinel values
//! - `timeout = 0s` → no per-run timeout
//! - `trigger_capacity = 0` / `observer_capacity = 0` → clamped to 1

use std::time::Duration;

/// Configuration for the lifecycle runtime.
///
/// ## Field semantics
/// - `trigger_capacity`: foreground/background trigger queue size (min 1)
/// - `observer_capacity`: default per-observer event queue size (min 1)
/// - `timeout`: default per-run timeout for initializers (`0s` = no timeout)
///
/// ## Notes
/// All fields are public. Prefer the helper accessors to avoid sprinkling
/// sentinel checks (`0`) across the codebase.
#[derive(Clone, Debug)]
pub struct LifecycleConfig {
    /// Capacity of the trigger queue feeding the coordinator.
    ///
    /// When full, `foreground()`/`background()` wait and the `try_` variants
    /// return [`TriggerError::Full`](crate::TriggerError::Full).
    pub trigger_capacity: usize,

    /// Default event queue capacity for observers that do not choose their own.
    pub observer_capacity: usize,

    /// Default per-run timeout.
    ///
    /// - `Duration::ZERO` = no timeout
    /// - `> 0` = applied to every run unless the initializer overrides it
    pub timeout: Duration,
}

impl LifecycleConfig {
    /// Returns the default per-run timeout as an `Option`.
    #[inline]
    pub fn default_timeout(&self) -> Option<Duration> {
        if self.timeout == Duration::ZERO {
            None
        } else {
            Some(self.timeout)
        }
    }

    #[inline]
    pub fn trigger_capacity_clamped(&self) -> usize {
        self.trigger_capacity.max(1)
    }

    #[inline]
    pub fn observer_capacity_clamped(&self) -> usize {
        self.observer_capacity.max(1)
    }
}

impl Default for LifecycleConfig {
    /// Default configuration:
    ///
    /// - `trigger_capacity = 64`
    /// - `observer_capacity = 1024`
    /// - `timeout = 0s` (no timeout)
    fn default() -> Self {
        Self {
            trigger_capacity: 64,
            observer_capacity: 1024,
            timeout: Duration::ZERO,
        }
    }
}
