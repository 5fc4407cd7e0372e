//! Adapter implementations of request ports.

pub mod memory;
pub mod postgres;
