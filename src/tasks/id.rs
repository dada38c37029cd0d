//! # Stable initializer identity.
//!
//! [`InitId`] is the key used by the registry, the completed set and the
//! in-progress stack. Two initializers are "the same" if and only if their
//! ids compare equal; their contents are never compared.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Caller-assigned identity of an initializer.
///
/// Cheap to clone (`Arc<str>` inside).
///
/// ```
/// use initvisor::InitId;
///
/// let a = InitId::from("db");
/// let b = InitId::from(String::from("db"));
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "db");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InitId(Arc<str>);

impl InitId {
    /// Creates an identity from any string-like value.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the identity as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for InitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for InitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for InitId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for InitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for InitId {
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl From<String> for InitId {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl From<Arc<str>> for InitId {
    fn from(s: Arc<str>) -> Self {
        Self(s)
    }
}

impl From<&InitId> for InitId {
    fn from(id: &InitId) -> Self {
        id.clone()
    }
}

impl From<InitId> for Arc<str> {
    fn from(id: InitId) -> Self {
        id.0
    }
}
