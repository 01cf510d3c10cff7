//! The perfwatch data model.
//!
//! Samples flow into aggregates, aggregates are classified into tiers and
//! compared against baselines; monitor readings drive a persisted alert
//! state that emits immutable alert events.

pub mod aggregate;
pub mod comparison;
pub mod history;
pub mod monitor;
pub mod sample;
pub mod tier;
pub mod trend;

pub use aggregate::{AggregateResult, AggregateStats, InsufficientData, InsufficientReason};
pub use comparison::{ComparisonResult, Impact, Verdict};
pub use history::HistoryRecord;
pub use monitor::{AlertEvent, AlertStatus, MissedTick, MonitorState, Severity};
pub use sample::Sample;
pub use tier::{Classification, Tier, TierSet};
pub use trend::{Trend, TrendDirection};
