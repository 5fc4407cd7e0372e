//! Error types for the request domain.

use super::{RequestStatus, ServiceRequestId};
use thiserror::Error;

/// Errors raised by request lifecycle rules.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestDomainError {
    /// The move is not in the transition table for the current status.
    #[error("invalid transition for request {request_id}: {from} -> {to}")]
    InvalidTransition {
        /// Request being moved.
        request_id: ServiceRequestId,
        /// Status the request is in.
        from: RequestStatus,
        /// Status that was requested.
        to: RequestStatus,
    },
}

/// Error returned while parsing a request status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown request status: {0}")]
pub struct ParseRequestStatusError(pub String);

/// Error returned while parsing a priority.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown priority: {0}")]
pub struct ParsePriorityError(pub String);
