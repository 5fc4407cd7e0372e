//! Crate-wide error classification.
//!
//! Every service error maps onto one [`ErrorKind`] so that callers (the HTTP
//! layer in particular) can decide what to surface and what to retry without
//! matching on every context-specific variant.

use serde::Serialize;
use std::fmt;

/// Caller-facing classification of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// One or more input fields failed schema constraints.
    Validation,
    /// The requested status change is not permitted from the current state.
    InvalidTransition,
    /// The referenced record does not exist within the caller's organization.
    NotFound,
    /// An optimistic concurrency guard rejected the write.
    ConcurrentModification,
    /// The persistence layer timed out or was unreachable.
    Transient,
    /// Unexpected internal failure.
    Fatal,
}

impl ErrorKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::InvalidTransition => "invalid_transition",
            Self::NotFound => "not_found",
            Self::ConcurrentModification => "concurrent_modification",
            Self::Transient => "transient",
            Self::Fatal => "fatal",
        }
    }

    /// Returns `true` when retrying the same call may succeed.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Transient)
    }

    /// Returns `true` when the error detail is safe to show to end users.
    #[must_use]
    pub const fn is_user_facing(self) -> bool {
        matches!(
            self,
            Self::Validation | Self::InvalidTransition | Self::ConcurrentModification
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
