//! Request status and the transition table.

use super::ParseRequestStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a service request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Received, waiting for a provider.
    Pending,
    /// A provider has been dispatched.
    Assigned,
    /// Work has started on site.
    InProgress,
    /// Work is finished.
    Completed,
    /// The request was withdrawn.
    Cancelled,
}

impl RequestStatus {
    /// Every status in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Assigned,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Every accepted status string.
    pub const NAMES: &'static [&'static str] =
        &["pending", "assigned", "in_progress", "completed", "cancelled"];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns the statuses reachable from this one.
    #[must_use]
    pub const fn allowed_transitions(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Assigned, Self::Cancelled],
            Self::Assigned => &[Self::InProgress, Self::Pending, Self::Cancelled],
            Self::InProgress => &[Self::Completed, Self::Cancelled],
            Self::Completed | Self::Cancelled => &[],
        }
    }

    /// Returns whether moving to `target` is allowed.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// Returns `true` for statuses with no outgoing transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for RequestStatus {
    type Error = ParseRequestStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "assigned" => Ok(Self::Assigned),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseRequestStatusError(value.to_owned())),
        }
    }
}
