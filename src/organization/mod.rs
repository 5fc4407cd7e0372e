//! Tenant directory.
//!
//! Organizations scope every other record. This module resolves tenants by
//! identifier (tenant routes) and by slug (inbound webhooks).

pub mod adapters;
mod domain;
mod ports;

pub use domain::{Organization, OrganizationId};
pub use ports::OrganizationDirectory;
