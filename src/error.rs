//! Error types used by initvisor.
//!
//! This module defines the error enums of the crate:
//!
//! - [`TaskError`] — errors raised by an initializer's run operation.
//! - [`InitError`] — resolution failures that abort a phase (cycles, missing
//!   dependencies, failed runs).
//! - [`BuildError`] — errors raised while constructing the lifecycle.
//! - [`TriggerError`] — errors raised when a trigger cannot reach the coordinator.
//!
//! Every type provides `as_label` (stable snake_case label for logs/metrics).

use std::time::Duration;
use thiserror::Error;

use crate::tasks::InitId;

/// # Errors produced by an initializer's run operation.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// The run operation exceeded its timeout.
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// The timeout duration that was exceeded.
        timeout: Duration,
    },

    /// The run operation failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The run operation gave up because its cancellation token fired.
    #[error("context cancelled")]
    Canceled,
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`] from anything displayable.
    ///
    /// # Example
    /// ```
    /// use initvisor::TaskError;
    ///
    /// let err = TaskError::fail("disk full");
    /// assert_eq!(err.to_string(), "execution failed: disk full");
    /// ```
    pub fn fail(error: impl std::fmt::Display) -> Self {
        TaskError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use initvisor::TaskError;
    /// use std::time::Duration;
    ///
    /// let err = TaskError::Timeout { timeout: Duration::from_secs(1) };
    /// assert_eq!(err.as_label(), "task_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Timeout { .. } => "task_timeout",
            TaskError::Fail { .. } => "task_failed",
            TaskError::Canceled => "task_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Timeout { timeout } => format!("timeout: {timeout:?}"),
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Canceled => "context cancelled".to_string(),
        }
    }
}

/// # Errors produced while resolving an initializer's dependency closure.
///
/// Any of these aborts the enclosing phase; the error is then carried by the
/// phase's [`PhaseState::Failed`](crate::PhaseState::Failed).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum InitError {
    /// The initializer depends on itself, directly or transitively.
    #[error("circular dependency detected at `{id}`")]
    CircularDependency {
        /// Initializer found twice on the resolution stack.
        id: InitId,
    },

    /// A dependency identity is not present in the registry.
    #[error("dependency `{id}` of `{required_by}` is not registered")]
    MissingDependency {
        /// The unregistered identity.
        id: InitId,
        /// The initializer that listed it.
        required_by: InitId,
    },

    /// The initializer's run operation returned an error.
    #[error("initializer `{id}` failed: {source}")]
    TaskFailed {
        /// The failed initializer.
        id: InitId,
        /// The error returned by the run operation.
        #[source]
        source: TaskError,
    },
}

impl InitError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use initvisor::{InitError, InitId};
    ///
    /// let err = InitError::CircularDependency { id: InitId::from("db") };
    /// assert_eq!(err.as_label(), "init_circular_dependency");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            InitError::CircularDependency { .. } => "init_circular_dependency",
            InitError::MissingDependency { .. } => "init_missing_dependency",
            InitError::TaskFailed { .. } => "init_task_failed",
        }
    }

    /// Identity the error is about.
    ///
    /// For [`InitError::MissingDependency`] this is the *missing* identity.
    pub fn id(&self) -> &InitId {
        match self {
            InitError::CircularDependency { id }
            | InitError::MissingDependency { id, .. }
            | InitError::TaskFailed { id, .. } => id,
        }
    }
}

/// # Errors produced while building a [`Lifecycle`](crate::Lifecycle).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Two initializers share the same identity.
    #[error("initializer `{id}` is registered more than once")]
    DuplicateInitializer {
        /// The duplicated identity.
        id: InitId,
    },
}

impl BuildError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            BuildError::DuplicateInitializer { .. } => "build_duplicate_initializer",
        }
    }
}

/// Error returned by the trigger methods of [`Lifecycle`](crate::Lifecycle).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerError {
    /// Trigger queue is full (try again later or use the async variant).
    #[error("trigger queue full")]
    Full,

    /// Coordinator is gone (shut down).
    #[error("coordinator closed")]
    Closed,
}

impl TriggerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TriggerError::Full => "trigger_full",
            TriggerError::Closed => "trigger_closed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dependency_reports_missing_id() {
        let err = InitError::MissingDependency {
            id: InitId::from("cache"),
            required_by: InitId::from("api"),
        };
        assert_eq!(err.id().as_str(), "cache");
        assert_eq!(
            err.to_string(),
            "dependency `cache` of `api` is not registered"
        );
    }

    #[test]
    fn test_task_failed_keeps_source() {
        use std::error::Error as _;

        let err = InitError::TaskFailed {
            id: InitId::from("db"),
            source: TaskError::fail("refused"),
        };
        assert_eq!(err.as_label(), "init_task_failed");
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("execution failed: refused"));
    }
}
