//! Per-status request counts.

use super::RequestStatus;
use serde::Serialize;

/// Count of live requests in each status. Every status is present, zeros
/// included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    /// Requests waiting for a provider.
    pub pending: u64,
    /// Requests with a dispatched provider.
    pub assigned: u64,
    /// Requests being worked on.
    pub in_progress: u64,
    /// Finished requests.
    pub completed: u64,
    /// Withdrawn requests.
    pub cancelled: u64,
}

impl StatusSummary {
    /// Builds a summary from `(status, count)` pairs. Missing statuses count
    /// as zero; repeated statuses accumulate.
    #[must_use]
    pub fn from_counts(counts: impl IntoIterator<Item = (RequestStatus, u64)>) -> Self {
        let mut summary = Self::default();
        for (status, count) in counts {
            let slot = summary.slot_mut(status);
            *slot = slot.saturating_add(count);
        }
        summary
    }

    /// Returns the count for one status.
    #[must_use]
    pub const fn get(&self, status: RequestStatus) -> u64 {
        match status {
            RequestStatus::Pending => self.pending,
            RequestStatus::Assigned => self.assigned,
            RequestStatus::InProgress => self.in_progress,
            RequestStatus::Completed => self.completed,
            RequestStatus::Cancelled => self.cancelled,
        }
    }

    /// Returns the number of live requests across all statuses.
    #[must_use]
    pub fn total(&self) -> u64 {
        RequestStatus::ALL
            .iter()
            .fold(0_u64, |total, status| total.saturating_add(self.get(*status)))
    }

    const fn slot_mut(&mut self, status: RequestStatus) -> &mut u64 {
        match status {
            RequestStatus::Pending => &mut self.pending,
            RequestStatus::Assigned => &mut self.assigned,
            RequestStatus::InProgress => &mut self.in_progress,
            RequestStatus::Completed => &mut self.completed,
            RequestStatus::Cancelled => &mut self.cancelled,
        }
    }
}
