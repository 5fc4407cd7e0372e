//! Adapter implementations of the service type catalogue.

pub mod memory;
pub mod postgres;
