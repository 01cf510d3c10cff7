//! TierClassifier.

use perfwatch_core::types::{AggregateResult, Classification, TierSet};

/// Classify an aggregate by its mean: the first tier whose upper bound is
/// at least the mean, else the worst tier. Insufficient data stays
/// insufficient.
pub fn classify(aggregate: &AggregateResult, tiers: &TierSet) -> Classification {
    match aggregate.mean() {
        Some(mean) => Classification::Tier(tiers.classify_value(mean).to_string()),
        None => Classification::InsufficientData,
    }
}
