//! Ready-made summaries for the standard fire occurrence questions: where
//! fires burn, what causes them, how large they get, which were largest,
//! what a single year looked like, and how activity changes across years.

use std::collections::{BTreeMap, BTreeSet};

use fire_stats_analytics_models::{
    AreaSummary, CategoryCount, CauseAcreage, CauseBreakdown, DashboardOptions, FireAcreage,
    FireSelection, GroupKey, LargestFire, YearPoint, YearSnapshot,
};
use fire_stats_fire_models::{FireRecord, SizeClassScheme};

use crate::AnalyticsError;
use crate::queries::{count_by, filter_by_year, group_by, top_n};
use crate::spatial::{map_bounds, map_center, map_points};
use crate::stats::describe;

// ── Helpers ──────────────────────────────────────────────────────────────

fn total_acres(records: &[FireRecord]) -> f64 {
    records.iter().map(|r| r.size_acres).sum()
}

/// Counts per group of `key`, most frequent first, ties alphabetical.
fn ranked_counts(records: &[FireRecord], key: GroupKey) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = count_by(records, key)
        .into_iter()
        .map(|(value, count)| CategoryCount {
            category: value.to_string(),
            count,
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
    counts
}

// ── Area information ─────────────────────────────────────────────────────

/// Fire count, acres and share of all acres per administrative area,
/// alphabetical by area.
#[must_use]
pub fn area_summaries(records: &[FireRecord]) -> Vec<AreaSummary> {
    let grand_total = total_acres(records);

    group_by(records, GroupKey::Area)
        .into_iter()
        .map(|(area, group)| {
            let acres = total_acres(&group);
            AreaSummary {
                area: area.to_string(),
                fire_count: group.len() as u64,
                total_acres: acres,
                acreage_share: if grand_total > 0.0 {
                    acres / grand_total
                } else {
                    0.0
                },
            }
        })
        .collect()
}

// ── Causes ───────────────────────────────────────────────────────────────

/// Counts by cause category and by general cause.
#[must_use]
pub fn cause_breakdown(records: &[FireRecord]) -> CauseBreakdown {
    CauseBreakdown {
        total: records.len() as u64,
        by_cause: ranked_counts(records, GroupKey::Cause),
        by_general_cause: ranked_counts(records, GroupKey::GeneralCause),
    }
}

// ── Size classes ─────────────────────────────────────────────────────────

/// Fire count for every class of `scheme`, smallest class first. Classes no
/// fire falls into are reported with a zero count.
#[must_use]
pub fn size_class_counts(records: &[FireRecord], scheme: &SizeClassScheme) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for record in records {
        *counts.entry(record.size_class.label.as_str()).or_default() += 1;
    }

    scheme
        .classes()
        .into_iter()
        .map(|class| CategoryCount {
            count: counts.get(class.label.as_str()).copied().unwrap_or(0),
            category: class.label,
        })
        .collect()
}

/// Acreage statistics per cause among fires of one size class, alphabetical
/// by cause. A class with no fires yields an empty list.
#[must_use]
pub fn class_acreage_by_cause(records: &[FireRecord], size_class: &str) -> Vec<CauseAcreage> {
    let in_class: Vec<FireRecord> = records
        .iter()
        .filter(|r| r.size_class.label == size_class)
        .cloned()
        .collect();

    group_by(&in_class, GroupKey::Cause)
        .into_iter()
        .filter_map(|(cause, group)| {
            describe(&group).ok().map(|stats| CauseAcreage {
                cause: cause.to_string(),
                stats,
            })
        })
        .collect()
}

// ── Largest fires ────────────────────────────────────────────────────────

/// Table rows for the `n` largest fires.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyInput`] when `records` is empty and `n` is
/// non-zero.
pub fn largest_fires(records: &[FireRecord], n: usize) -> Result<Vec<LargestFire>, AnalyticsError> {
    Ok(top_n(records, n)?
        .into_iter()
        .map(|record| LargestFire {
            id: record.id,
            fire_year: record.fire_year,
            fire_name: record.fire_name,
            district: record.location.district,
            size_acres: record.size_acres,
            coordinates: record.location.coordinates,
            cause: record.cause,
        })
        .collect())
}

// ── Single year ──────────────────────────────────────────────────────────

/// Counts, area breakdown and map data for one reporting year. A year with
/// no fires yields zero counts and no map extent.
#[must_use]
pub fn year_snapshot(records: &[FireRecord], year: i32) -> YearSnapshot {
    let fires = filter_by_year(records, year);
    log::debug!("year_snapshot: {} fires in {year}", fires.len());

    YearSnapshot {
        fire_year: year,
        fire_count: fires.len() as u64,
        total_acres: total_acres(&fires),
        by_area: ranked_counts(&fires, GroupKey::Area),
        points: map_points(&fires),
        bounds: map_bounds(&fires),
        center: map_center(&fires),
    }
}

// ── Across years ─────────────────────────────────────────────────────────

/// Per-year totals with a per-cause split, ascending by year.
#[must_use]
pub fn yearly_trend(records: &[FireRecord]) -> Vec<YearPoint> {
    let mut years: BTreeMap<i32, Vec<FireRecord>> = BTreeMap::new();
    for record in records {
        years.entry(record.fire_year).or_default().push(record.clone());
    }

    years
        .into_iter()
        .map(|(fire_year, fires)| YearPoint {
            fire_year,
            fire_count: fires.len() as u64,
            total_acres: total_acres(&fires),
            by_cause: count_by(&fires, GroupKey::Cause)
                .into_iter()
                .map(|(cause, count)| CategoryCount {
                    category: cause.to_string(),
                    count,
                })
                .collect(),
        })
        .collect()
}

/// Distinct size classes, causes and years present in `records`.
#[must_use]
pub fn dashboard_options(records: &[FireRecord]) -> DashboardOptions {
    let classes: BTreeSet<_> = records.iter().map(|r| &r.size_class).collect();
    let causes: BTreeSet<&str> = records.iter().map(|r| r.cause.as_str()).collect();
    let years: BTreeSet<i32> = records.iter().map(|r| r.fire_year).collect();

    DashboardOptions {
        size_classes: classes.into_iter().map(|c| c.label.clone()).collect(),
        causes: causes.into_iter().map(str::to_string).collect(),
        years: years.into_iter().collect(),
    }
}

/// Acres burned per fire name for one size class, cause and year, largest
/// first. Unnamed fires are pooled into a single row with no name.
#[must_use]
pub fn dashboard_selection(records: &[FireRecord], selection: &FireSelection) -> Vec<FireAcreage> {
    let mut by_name: BTreeMap<Option<&str>, (u64, f64)> = BTreeMap::new();
    for record in records.iter().filter(|r| selection.matches(r)) {
        let entry = by_name.entry(record.fire_name.as_deref()).or_default();
        entry.0 += 1;
        entry.1 += record.size_acres;
    }

    let mut rows: Vec<FireAcreage> = by_name
        .into_iter()
        .map(|(name, (fire_count, total_acres))| FireAcreage {
            fire_name: name.map(str::to_string),
            fire_count,
            total_acres,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_acres
            .total_cmp(&a.total_acres)
            .then_with(|| a.fire_name.cmp(&b.fire_name))
    });
    rows
}
