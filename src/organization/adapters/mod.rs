//! Adapter implementations of the organization directory.

pub mod memory;
pub mod postgres;
