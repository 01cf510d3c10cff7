//! Resource monitor configuration.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::types::{Tier, TierSet};

pub const DEFAULT_THRESHOLD: f64 = 85.0;
pub const DEFAULT_HYSTERESIS_MARGIN: f64 = 5.0;
pub const DEFAULT_ALERT_COOLDOWN_SECS: u64 = 0;
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 500;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_STATE_DIR: &str = ".perfwatch";
pub const DEFAULT_ALERT_LOG: &str = ".perfwatch/alerts.jsonl";
pub const DEFAULT_WORST_TIER: &str = "high";

/// Default health tiers for percentage metrics.
pub fn default_tiers() -> Vec<Tier> {
    vec![Tier::new("healthy", 70.0), Tier::new("moderate", 85.0)]
}

/// Default health tiers for CPU load, used when no tiers are configured.
pub fn default_load_tiers() -> Vec<Tier> {
    vec![Tier::new("healthy", 60.0), Tier::new("moderate", 80.0)]
}

/// Configuration for the periodic monitor.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// Alert when a reading rises above this. Default: 85.0.
    pub threshold: Option<f64>,
    /// Clear only once a reading is at or below `threshold - margin`. Default: 5.0.
    pub hysteresis_margin: Option<f64>,
    /// Minimum seconds between two emitted alerts for one metric. Default: 0.
    pub alert_cooldown_secs: Option<u64>,
    /// Readings at or above this raise CRITICAL instead of WARNING. Default: none.
    pub critical_threshold: Option<f64>,
    /// How long a tick waits for the state lock. Default: 500.
    pub lock_timeout_ms: Option<u64>,
    /// How long a metric read may take before the tick gives up on it.
    /// Default: 10000; 0 disables.
    pub read_timeout_ms: Option<u64>,
    /// Directory holding `<metric>.state.json` and `<metric>.lock`. Default: ".perfwatch".
    pub state_dir: Option<PathBuf>,
    /// JSONL alert log. Default: ".perfwatch/alerts.jsonl".
    pub alert_log: Option<PathBuf>,
    /// Health tiers for readings. Default: healthy 70 / moderate 85
    /// (load: healthy 60 / moderate 80).
    #[serde(default)]
    pub tiers: Vec<Tier>,
    /// Name of the unbounded health tier. Default: "high".
    pub worst_tier: Option<String>,
    /// Per-metric overrides keyed by metric name.
    #[serde(default)]
    pub metrics: BTreeMap<String, MetricConfig>,
}

/// Per-metric overrides of the global alert parameters.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct MetricConfig {
    pub threshold: Option<f64>,
    pub hysteresis_margin: Option<f64>,
    pub alert_cooldown_secs: Option<u64>,
    pub critical_threshold: Option<f64>,
    /// Health tiers for this metric only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tiers: Vec<Tier>,
}

/// Resolved alert parameters for one metric stream.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSettings {
    pub metric: String,
    pub threshold: f64,
    pub hysteresis_margin: f64,
    pub alert_cooldown: Duration,
    pub critical_threshold: Option<f64>,
}

impl MetricSettings {
    pub fn new(metric: impl Into<String>, threshold: f64, hysteresis_margin: f64) -> Self {
        Self {
            metric: metric.into(),
            threshold,
            hysteresis_margin,
            alert_cooldown: Duration::ZERO,
            critical_threshold: None,
        }
    }

    /// Readings at or below this value clear an active alert.
    pub fn clear_level(&self) -> f64 {
        self.threshold - self.hysteresis_margin
    }

    fn validate(&self, field: &str) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() {
            return Err(ConfigError::ValidationFailed {
                field: format!("{field}.threshold"),
                message: "must be a finite number".to_string(),
            });
        }
        if !self.hysteresis_margin.is_finite() || self.hysteresis_margin < 0.0 {
            return Err(ConfigError::ValidationFailed {
                field: format!("{field}.hysteresis_margin"),
                message: "must be a non-negative number".to_string(),
            });
        }
        if let Some(critical) = self.critical_threshold {
            if !critical.is_finite() || critical <= self.threshold {
                return Err(ConfigError::ValidationFailed {
                    field: format!("{field}.critical_threshold"),
                    message: "must be greater than threshold".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl MonitorConfig {
    pub fn effective_threshold(&self) -> f64 {
        self.threshold.unwrap_or(DEFAULT_THRESHOLD)
    }

    pub fn effective_hysteresis_margin(&self) -> f64 {
        self.hysteresis_margin.unwrap_or(DEFAULT_HYSTERESIS_MARGIN)
    }

    pub fn effective_alert_cooldown_secs(&self) -> u64 {
        self.alert_cooldown_secs.unwrap_or(DEFAULT_ALERT_COOLDOWN_SECS)
    }

    pub fn effective_lock_timeout_ms(&self) -> u64 {
        self.lock_timeout_ms.unwrap_or(DEFAULT_LOCK_TIMEOUT_MS)
    }

    pub fn effective_read_timeout_ms(&self) -> u64 {
        self.read_timeout_ms.unwrap_or(DEFAULT_READ_TIMEOUT_MS)
    }

    pub fn effective_state_dir(&self) -> PathBuf {
        self.state_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
    }

    pub fn effective_alert_log(&self) -> PathBuf {
        self.alert_log
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ALERT_LOG))
    }

    /// Validate and resolve into the form the monitor consumes.
    pub fn settings(&self) -> Result<MonitorSettings, ConfigError> {
        let defaults = MetricSettings {
            metric: String::new(),
            threshold: self.effective_threshold(),
            hysteresis_margin: self.effective_hysteresis_margin(),
            alert_cooldown: Duration::from_secs(self.effective_alert_cooldown_secs()),
            critical_threshold: self.critical_threshold,
        };
        defaults.validate("monitor")?;

        let worst = self
            .worst_tier
            .clone()
            .unwrap_or_else(|| DEFAULT_WORST_TIER.to_string());

        let mut metrics = BTreeMap::new();
        let mut metric_tiers = BTreeMap::new();
        for (name, overrides) in &self.metrics {
            let resolved = MetricSettings {
                metric: name.clone(),
                threshold: overrides.threshold.unwrap_or(defaults.threshold),
                hysteresis_margin: overrides
                    .hysteresis_margin
                    .unwrap_or(defaults.hysteresis_margin),
                alert_cooldown: overrides
                    .alert_cooldown_secs
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.alert_cooldown),
                critical_threshold: overrides.critical_threshold.or(defaults.critical_threshold),
            };
            resolved.validate(&format!("monitor.metrics.{name}"))?;
            metrics.insert(name.clone(), resolved);

            if !overrides.tiers.is_empty() {
                let tiers = TierSet::new(
                    &format!("monitor.metrics.{name}.tiers"),
                    overrides.tiers.clone(),
                    worst.clone(),
                )?;
                metric_tiers.insert(name.clone(), tiers);
            }
        }

        let tiers = if self.tiers.is_empty() {
            if !metric_tiers.contains_key("load") {
                let load = TierSet::new("monitor.tiers", default_load_tiers(), worst.clone())?;
                metric_tiers.insert("load".to_string(), load);
            }
            default_tiers()
        } else {
            self.tiers.clone()
        };
        let tiers = TierSet::new("monitor.tiers", tiers, worst)?;
        let read_timeout_ms = self.effective_read_timeout_ms();

        Ok(MonitorSettings {
            defaults,
            metrics,
            tiers,
            metric_tiers,
            lock_timeout: Duration::from_millis(self.effective_lock_timeout_ms()),
            read_timeout: (read_timeout_ms > 0).then(|| Duration::from_millis(read_timeout_ms)),
            state_dir: self.effective_state_dir(),
            alert_log: self.effective_alert_log(),
        })
    }
}

/// Validated monitor configuration, built once per invocation.
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    defaults: MetricSettings,
    metrics: BTreeMap<String, MetricSettings>,
    /// Health tiers for metrics without their own.
    pub tiers: TierSet,
    metric_tiers: BTreeMap<String, TierSet>,
    pub lock_timeout: Duration,
    /// `None` when reads may block indefinitely.
    pub read_timeout: Option<Duration>,
    pub state_dir: PathBuf,
    pub alert_log: PathBuf,
}

impl MonitorSettings {
    /// Alert parameters for `metric`: its overrides, or the global values.
    pub fn metric(&self, metric: &str) -> MetricSettings {
        self.metrics.get(metric).cloned().unwrap_or_else(|| MetricSettings {
            metric: metric.to_string(),
            ..self.defaults.clone()
        })
    }

    /// Health tiers for `metric`: its own tiers, else the global ones.
    pub fn tiers_for(&self, metric: &str) -> &TierSet {
        self.metric_tiers.get(metric).unwrap_or(&self.tiers)
    }
}
