//! Services layer (ports + adapters).
//!
//! - `ports`: pure contracts/types used across the explorer (kernel-facing).
//! - `adapters`: HTTP, filesystem and async runtime implementations.

pub mod adapters;
pub mod ports;
