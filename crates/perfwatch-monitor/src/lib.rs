//! # perfwatch-monitor
//!
//! Periodic resource monitoring without a resident process: each
//! invocation runs one tick that reads a metric, feeds it through a
//! debounced threshold state machine, and persists the state for the next
//! invocation.

pub mod probes;
pub mod state_machine;
pub mod tick;

pub use probes::{
    builtin_probe, CommandMetricProbe, DiskUsageProbe, LoadAverageProbe, MemInfoProbe,
};
pub use state_machine::{AlertStateMachine, Transition};
pub use tick::{tick, TickOutcome};
