//! Tenant-scoped service type catalogue.
//!
//! Requests and provider skills reference service types by identifier.
//! Inbound intake resolves free-text names against the catalogue with
//! [`best_match`].

pub mod adapters;
mod domain;
mod ports;

pub use domain::{ServiceType, ServiceTypeId, best_match};
pub use ports::ServiceTypeRepository;
