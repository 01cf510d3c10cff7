//! Observability for perfwatch.
//! `tracing` crate with `EnvFilter`, per-crate log levels via `PERFWATCH_LOG`.

pub mod setup;

pub use setup::init_tracing;
