//! One monitor tick: lock, load, read, transition, alert, save, unlock.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use perfwatch_bench::read_metric_within;
use perfwatch_core::config::MonitorSettings;
use perfwatch_core::errors::{MonitorError, ProbeError};
use perfwatch_core::traits::{AlertSink, MetricProbe};
use perfwatch_core::types::{AlertEvent, AlertStatus};
use perfwatch_storage::MonitorStateStore;

use crate::state_machine::AlertStateMachine;

/// What a tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Another tick held the state lock past the timeout. Nothing changed
    /// except the missed-tick log.
    Skipped {
        /// Ticks of this metric missed so far, including this one. `None`
        /// when the missed-tick log could not be written.
        missed_ticks: Option<usize>,
    },
    /// The metric could not be read in time. State was not saved.
    ReadFailed { error: ProbeError },
    /// A reading was applied and the new state saved.
    Observed {
        value: f64,
        status: AlertStatus,
        /// Health tier of the reading.
        health: String,
        /// The alert emitted by this tick, if it raised one.
        alert: Option<AlertEvent>,
        /// A raise happened but its alert fell inside the cooldown.
        suppressed: bool,
    },
}

impl TickOutcome {
    pub fn raised_alert(&self) -> bool {
        matches!(self, Self::Observed { alert: Some(_), .. })
    }

    pub fn status_label(&self) -> &'static str {
        match self {
            Self::Skipped { .. } => "skipped",
            Self::ReadFailed { .. } => "read_failed",
            Self::Observed { status, .. } => status.as_str(),
        }
    }
}

/// Run one tick for `probe`'s metric.
///
/// The read is bounded by `settings.read_timeout`, so a hung probe cannot
/// hold the state lock past it. The alert is appended to `sink` before the
/// new state is saved, so a crash between the two repeats the alert on the
/// next tick rather than losing it.
pub fn tick(
    probe: Arc<dyn MetricProbe>,
    settings: &MonitorSettings,
    store: &MonitorStateStore,
    sink: &dyn AlertSink,
    now: DateTime<Utc>,
) -> Result<TickOutcome, MonitorError> {
    let metric = probe.metric();
    let machine = AlertStateMachine::new(settings.metric(metric));

    let outcome = store.with_exclusive(
        metric,
        settings.lock_timeout,
        |locked| -> Result<_, MonitorError> {
            let state = locked.load()?;

            let sample = match read_metric_within(Arc::clone(&probe), settings.read_timeout) {
                Ok(sample) => sample,
                Err(error) => {
                    warn!(metric, error = %error, "metric read failed, state left untouched");
                    return Ok(TickOutcome::ReadFailed { error });
                }
            };

            let transition = machine.observe(&state, sample.value, now);
            if let Some(ref event) = transition.event {
                sink.record(event)?;
                warn!(
                    metric,
                    value = event.value,
                    threshold = event.threshold,
                    severity = event.severity.as_str(),
                    "threshold exceeded"
                );
            }
            locked.save(&transition.state)?;

            let status = transition.state.status;
            info!(
                metric,
                value = sample.value,
                status = status.as_str(),
                "tick complete"
            );
            Ok(TickOutcome::Observed {
                value: sample.value,
                status,
                health: settings.tiers_for(metric).classify_value(sample.value).to_string(),
                alert: transition.event,
                suppressed: transition.suppressed,
            })
        },
    )?;

    if let Some(outcome) = outcome {
        return Ok(outcome);
    }
    let missed_ticks = match store.record_missed(metric, now, settings.lock_timeout) {
        Ok(count) => Some(count),
        Err(e) => {
            warn!(metric, error = %e, "could not log missed tick");
            None
        }
    };
    warn!(metric, missed_ticks, "missed tick: state lock busy");
    Ok(TickOutcome::Skipped { missed_ticks })
}
