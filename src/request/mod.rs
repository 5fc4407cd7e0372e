//! Service request lifecycle for Fieldline.
//!
//! Requests are opened by staff or by inbound webhooks, moved through the
//! status machine with provider assignment, and soft-deleted for audit.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
