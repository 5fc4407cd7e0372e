//! Adapter implementations of provider ports.

pub mod memory;
pub mod postgres;
