//! Provider lifecycle for Fieldline.
//!
//! Covers registration, status updates within a status vocabulary, skill
//! replacement, and soft deletion that first releases every request still
//! assigned to the provider.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
