//! Append-only history entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AggregateResult;

/// One benchmark run as persisted by a result store. Never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub operation: String,
    pub timestamp: DateTime<Utc>,
    pub aggregate: AggregateResult,
}

impl HistoryRecord {
    pub fn new(aggregate: AggregateResult, timestamp: DateTime<Utc>) -> Self {
        Self {
            operation: aggregate.operation().to_string(),
            timestamp,
            aggregate,
        }
    }
}
