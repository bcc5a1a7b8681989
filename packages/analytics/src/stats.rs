//! Descriptive statistics over acreage.

use std::collections::BTreeMap;

use fire_stats_analytics_models::{AcreageStats, GroupKey, GroupValue};
use fire_stats_fire_models::FireRecord;

use crate::AnalyticsError;
use crate::queries::group_by;

/// Quantile of sorted values by linear interpolation between closest ranks.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    #[allow(clippy::cast_precision_loss)]
    let position = p * (sorted.len() - 1) as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let fraction = position - position.floor();
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Summarizes a set of acreages.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyInput`] when `values` is empty.
#[allow(clippy::cast_precision_loss)]
pub fn describe_values(values: &[f64]) -> Result<AcreageStats, AnalyticsError> {
    if values.is_empty() {
        return Err(AnalyticsError::EmptyInput {
            operation: "describe",
        });
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len() as f64;
    let mean = sorted.iter().sum::<f64>() / n;
    let std = (sorted.len() > 1).then(|| {
        let squares: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        (squares / (n - 1.0)).sqrt()
    });

    Ok(AcreageStats {
        count: sorted.len() as u64,
        mean,
        std,
        min: sorted[0],
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// Summarizes the acreage of `records`.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyInput`] when `records` is empty.
pub fn describe(records: &[FireRecord]) -> Result<AcreageStats, AnalyticsError> {
    let acres: Vec<f64> = records.iter().map(|r| r.size_acres).collect();
    describe_values(&acres)
}

/// Summarizes acreage per group of `key`. Empty input yields an empty map.
#[must_use]
pub fn describe_by(records: &[FireRecord], key: GroupKey) -> BTreeMap<GroupValue, AcreageStats> {
    group_by(records, key)
        .into_iter()
        .filter_map(|(value, group)| describe(&group).ok().map(|stats| (value, stats)))
        .collect()
}
