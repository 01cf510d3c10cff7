//! Quality tiers: named upper bounds on a statistic.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// A named bucket of acceptable performance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub name: String,
    pub upper_bound: f64,
}

impl Tier {
    pub fn new(name: impl Into<String>, upper_bound: f64) -> Self {
        Self {
            name: name.into(),
            upper_bound,
        }
    }
}

/// Outcome of classifying an aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "tier", rename_all = "snake_case")]
pub enum Classification {
    Tier(String),
    InsufficientData,
}

impl Classification {
    pub fn tier_name(&self) -> Option<&str> {
        match self {
            Self::Tier(name) => Some(name),
            Self::InsufficientData => None,
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tier(name) => f.write_str(name),
            Self::InsufficientData => f.write_str("insufficient data"),
        }
    }
}

/// Validated, strictly increasing tier list with a final unbounded tier.
///
/// Only constructible through [`TierSet::new`], so a `TierSet` in hand is
/// always disjoint and exhaustive.
#[derive(Debug, Clone, PartialEq)]
pub struct TierSet {
    tiers: Vec<Tier>,
    worst: String,
}

impl TierSet {
    /// Validate and build a tier set. `field` names the config key in errors.
    pub fn new(
        field: &str,
        tiers: Vec<Tier>,
        worst: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let worst = worst.into();
        let invalid = |message: String| ConfigError::InvalidTiers {
            field: field.to_string(),
            message,
        };

        if tiers.is_empty() {
            return Err(invalid("at least one bounded tier is required".to_string()));
        }
        if worst.trim().is_empty() {
            return Err(invalid("worst tier name must not be empty".to_string()));
        }

        let mut seen: Vec<&str> = Vec::with_capacity(tiers.len() + 1);
        let mut previous: Option<f64> = None;
        for tier in &tiers {
            if tier.name.trim().is_empty() {
                return Err(invalid("tier names must not be empty".to_string()));
            }
            if seen.contains(&tier.name.as_str()) {
                return Err(invalid(format!("duplicate tier name '{}'", tier.name)));
            }
            seen.push(&tier.name);
            if !tier.upper_bound.is_finite() {
                return Err(invalid(format!(
                    "tier '{}' has a non-finite upper bound",
                    tier.name
                )));
            }
            if let Some(prev) = previous {
                if tier.upper_bound <= prev {
                    return Err(invalid(format!(
                        "bounds must be strictly increasing: '{}' ({}) follows {}",
                        tier.name, tier.upper_bound, prev
                    )));
                }
            }
            previous = Some(tier.upper_bound);
        }
        if seen.contains(&worst.as_str()) {
            return Err(invalid(format!(
                "worst tier '{worst}' duplicates a bounded tier"
            )));
        }

        Ok(Self { tiers, worst })
    }

    /// Name of the first tier whose bound is `>= value`, else the worst tier.
    pub fn classify_value(&self, value: f64) -> &str {
        self.tiers
            .iter()
            .find(|t| t.upper_bound >= value)
            .map(|t| t.name.as_str())
            .unwrap_or(self.worst.as_str())
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn worst(&self) -> &str {
        &self.worst
    }
}
