//! Domain model for the service request lifecycle.
//!
//! The status machine in [`RequestStatus`] is the single source of truth for
//! which moves are legal. [`ServiceRequest::transition_to`] applies a move
//! together with an optional provider assignment change and keeps the
//! timestamp and version bookkeeping consistent.

mod assignment;
mod error;
mod ids;
mod priority;
mod request;
mod status;
mod summary;

pub use assignment::AssignmentChange;
pub use error::{ParsePriorityError, ParseRequestStatusError, RequestDomainError};
pub use ids::ServiceRequestId;
pub use priority::Priority;
pub use request::{CustomerContact, PersistedRequestData, RequestDetails, ServiceRequest};
pub use status::RequestStatus;
pub use summary::StatusSummary;
