//! # Function-backed initializer (`InitFn`)
//!
//! [`InitFn`] wraps a closure `F: Fn(CancellationToken) -> Fut`, producing a fresh
//! future per run. Active initializers run once per foreground cycle, so the
//! closure is `Fn`; share state explicitly with `Arc<...>` inside it.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use initvisor::{InitFn, InitRef, Priority, TaskError};
//!
//! let refresh: InitRef = InitFn::new("refresh-token", Priority::Active, |_ctx: CancellationToken| async {
//!     Ok::<_, TaskError>(())
//! })
//! .with_dependencies(["keychain"])
//! .into_ref();
//!
//! assert_eq!(refresh.id().as_str(), "refresh-token");
//! assert_eq!(refresh.dependencies().len(), 1);
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;
use crate::tasks::{InitId, Initializer, Priority};

/// Shared handle to an initializer.
pub type InitRef = Arc<dyn Initializer>;

/// Function-backed initializer.
pub struct InitFn<F> {
    id: InitId,
    priority: Priority,
    deps: Vec<InitId>,
    timeout: Option<Duration>,
    f: F,
}

impl<F> InitFn<F> {
    /// Creates a new function-backed initializer without dependencies.
    pub fn new(id: impl Into<InitId>, priority: Priority, f: F) -> Self {
        Self {
            id: id.into(),
            priority,
            deps: Vec::new(),
            timeout: None,
            f,
        }
    }

    /// Replaces the dependency list.
    pub fn with_dependencies<I, D>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<InitId>,
    {
        self.deps = deps.into_iter().map(Into::into).collect();
        self
    }

    /// Sets a per-run timeout overriding the lifecycle default.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl<F, Fut> InitFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    /// Creates an initializer without dependencies and returns it as an [`InitRef`].
    ///
    /// ```rust
    /// use tokio_util::sync::CancellationToken;
    /// use initvisor::{InitFn, InitRef, Priority, TaskError};
    ///
    /// let t: InitRef = InitFn::arc("logger", Priority::Launch, |_ctx: CancellationToken| async {
    ///     Ok::<_, TaskError>(())
    /// });
    /// assert_eq!(t.id().as_str(), "logger");
    /// ```
    pub fn arc(id: impl Into<InitId>, priority: Priority, f: F) -> InitRef {
        Self::new(id, priority, f).into_ref()
    }

    /// Converts the initializer into a shared handle.
    pub fn into_ref(self) -> InitRef {
        Arc::new(self)
    }
}

#[async_trait]
impl<F, Fut> Initializer for InitFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    fn id(&self) -> &InitId {
        &self.id
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn dependencies(&self) -> &[InitId] {
        &self.deps
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError> {
        (self.f)(ctx).await
    }
}

impl<F> std::fmt::Debug for InitFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitFn")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("deps", &self.deps)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
