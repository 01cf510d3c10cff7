//! # perfwatch-core
//!
//! Shared foundation for the perfwatch benchmarking harness and resource
//! monitor: the sample/aggregate/alert data model, one error enum per
//! subsystem, TOML configuration with layered resolution, tracing setup,
//! and the probe, clock and sink traits the other crates plug into.

pub mod config;
pub mod errors;
pub mod tracing;
pub mod traits;
pub mod types;
