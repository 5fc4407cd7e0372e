//! Port contracts for the request lifecycle.
//!
//! Ports define infrastructure-agnostic interfaces used by request services.

pub mod repository;

pub use repository::{RequestFilter, RequestQuery, ServiceRequestRepository};
