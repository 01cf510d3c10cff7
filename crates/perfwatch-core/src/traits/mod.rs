//! Trait seams between the harness and the outside world.

pub mod clock;
pub mod probe;
pub mod sink;

pub use clock::{Clock, MonotonicClock};
pub use probe::{MetricProbe, Probe};
pub use sink::AlertSink;
