//! Destination for emitted alert events.

use crate::errors::StorageError;
use crate::types::AlertEvent;

/// Append-only receiver of alert events.
pub trait AlertSink: Send + Sync {
    fn record(&self, event: &AlertEvent) -> Result<(), StorageError>;
}
