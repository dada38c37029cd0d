//! # Phase state.
//!
//! [`PhaseState`] is what each phase stream carries. `Failed` states compare
//! equal regardless of the carried error: consumers that diff states (the
//! composite stream, UI bindings) only care that a phase failed, not why.
//! Use [`PhaseState::error`] to get at the details.

use std::fmt;
use std::sync::Arc;

use crate::error::InitError;

/// State of one phase (Launch or Active), or the derived composite.
#[derive(Clone, Debug, Default)]
pub enum PhaseState {
    /// Not (yet) resolved.
    #[default]
    Pending,
    /// Every initializer of the phase resolved successfully.
    Complete,
    /// The phase aborted on the carried error.
    Failed(Arc<InitError>),
}

impl PhaseState {
    /// Derives the composite state of the two phases.
    ///
    /// - `Failed` if either phase failed (launch error wins if both did),
    /// - `Complete` if both completed,
    /// - `Pending` otherwise.
    ///
    /// ```
    /// use initvisor::PhaseState;
    ///
    /// let s = PhaseState::composite(&PhaseState::Complete, &PhaseState::Pending);
    /// assert_eq!(s, PhaseState::Pending);
    /// ```
    pub fn composite(launch: &PhaseState, active: &PhaseState) -> PhaseState {
        match (launch, active) {
            (PhaseState::Failed(_), _) => launch.clone(),
            (_, PhaseState::Failed(_)) => active.clone(),
            (PhaseState::Complete, PhaseState::Complete) => PhaseState::Complete,
            _ => PhaseState::Pending,
        }
    }

    /// True for `Complete` and `Failed`.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PhaseState::Pending)
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, PhaseState::Pending)
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        matches!(self, PhaseState::Complete)
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        matches!(self, PhaseState::Failed(_))
    }

    /// The carried error, if failed.
    pub fn error(&self) -> Option<&InitError> {
        match self {
            PhaseState::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Returns a short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            PhaseState::Pending => "pending",
            PhaseState::Complete => "complete",
            PhaseState::Failed(_) => "failed",
        }
    }
}

impl From<Result<(), InitError>> for PhaseState {
    fn from(res: Result<(), InitError>) -> Self {
        match res {
            Ok(()) => PhaseState::Complete,
            Err(e) => PhaseState::Failed(Arc::new(e)),
        }
    }
}

// Coarse: the error payload is ignored.
impl PartialEq for PhaseState {
    fn eq(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl Eq for PhaseState {}

impl fmt::Display for PhaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseState::Failed(e) => write!(f, "failed: {e}"),
            other => f.write_str(other.as_label()),
        }
    }
}
