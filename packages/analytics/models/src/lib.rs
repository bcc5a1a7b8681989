#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Grouping keys, filters and result types for fire analytics.
//!
//! Query functions live in `fire_stats_analytics`; this crate holds the
//! input/output types so a presentation layer can depend on them without
//! pulling in the query engine. Every result type serializes to camelCase
//! JSON.

use fire_stats_fire_models::{Coordinates, FireRecord, SizeClass};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

// ── Grouping ─────────────────────────────────────────────────────────────

/// A record attribute that records can be partitioned by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GroupKey {
    /// Canonical cause category.
    Cause,
    /// General cause detail.
    GeneralCause,
    /// Derived size class.
    SizeClass,
    /// Reporting year.
    FireYear,
    /// Administrative area.
    Area,
    /// Protection district.
    District,
    /// Protection unit.
    Unit,
    /// County.
    County,
    /// Incident name.
    FireName,
}

impl GroupKey {
    /// Extracts this key's value from a record. Absent optional fields
    /// yield [`GroupValue::Missing`].
    #[must_use]
    pub fn value_of(self, record: &FireRecord) -> GroupValue {
        let label = |value: Option<&String>| {
            value.map_or(GroupValue::Missing, |v| GroupValue::Label(v.clone()))
        };

        match self {
            Self::Cause => GroupValue::Label(record.cause.clone()),
            Self::GeneralCause => label(record.general_cause.as_ref()),
            Self::SizeClass => GroupValue::SizeClass(record.size_class.clone()),
            Self::FireYear => GroupValue::Year(record.fire_year),
            Self::Area => GroupValue::Label(record.location.area.clone()),
            Self::District => label(record.location.district.as_ref()),
            Self::Unit => label(record.location.unit.as_ref()),
            Self::County => label(record.location.county.as_ref()),
            Self::FireName => label(record.fire_name.as_ref()),
        }
    }
}

/// The value of a [`GroupKey`] for one record.
///
/// Values of one key always share a variant (apart from `Missing`), so
/// ordering sorts years numerically, size classes by rank and labels
/// alphabetically, with `Missing` last.
///
/// Serializes as its display string so grouped maps can be written as JSON
/// objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupValue {
    /// A reporting year.
    Year(i32),
    /// A size class.
    SizeClass(SizeClass),
    /// A text label (cause, area, name, ...).
    Label(String),
    /// The record had no value for an optional field.
    Missing,
}

impl std::fmt::Display for GroupValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Year(year) => write!(f, "{year}"),
            Self::SizeClass(class) => write!(f, "{class}"),
            Self::Label(label) => f.write_str(label),
            Self::Missing => f.write_str("(none)"),
        }
    }
}

impl Serialize for GroupValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One value per key of a composite grouping, in key order.
///
/// Serializes as the values' display strings joined with `" | "`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeKey(pub Vec<GroupValue>);

impl CompositeKey {
    /// Extracts the value of every key in `keys` from a record.
    #[must_use]
    pub fn of(keys: &[GroupKey], record: &FireRecord) -> Self {
        Self(keys.iter().map(|key| key.value_of(record)).collect())
    }

    /// The component values.
    #[must_use]
    pub fn values(&self) -> &[GroupValue] {
        &self.0
    }
}

impl std::fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

impl Serialize for CompositeKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<Vec<GroupValue>> for CompositeKey {
    fn from(values: Vec<GroupValue>) -> Self {
        Self(values)
    }
}

impl From<&str> for GroupValue {
    fn from(label: &str) -> Self {
        Self::Label(label.to_string())
    }
}

impl From<i32> for GroupValue {
    fn from(year: i32) -> Self {
        Self::Year(year)
    }
}

/// Scalar summary computed per group.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Metric {
    /// Number of records.
    Count,
    /// Sum of acres burned.
    TotalAcres,
    /// Mean acres burned.
    MeanAcres,
    /// Largest single fire.
    MaxAcres,
}

// ── Filters ──────────────────────────────────────────────────────────────

/// Conjunctive record filter. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FireFilter {
    /// First reporting year, inclusive.
    pub year_from: Option<i32>,
    /// Last reporting year, inclusive.
    pub year_to: Option<i32>,
    /// Canonical cause category.
    pub cause: Option<String>,
    /// Size class label.
    pub size_class: Option<String>,
    /// Administrative area.
    pub area: Option<String>,
}

impl FireFilter {
    /// Returns `true` when `record` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, record: &FireRecord) -> bool {
        self.year_from.is_none_or(|from| record.fire_year >= from)
            && self.year_to.is_none_or(|to| record.fire_year <= to)
            && self.cause.as_ref().is_none_or(|c| *c == record.cause)
            && self
                .size_class
                .as_ref()
                .is_none_or(|c| *c == record.size_class.label)
            && self.area.as_ref().is_none_or(|a| *a == record.location.area)
    }
}

/// One dashboard selection: a size class, a cause and a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FireSelection {
    /// Size class label.
    pub size_class: String,
    /// Canonical cause category.
    pub cause: String,
    /// Reporting year.
    pub fire_year: i32,
}

impl FireSelection {
    /// Returns `true` when `record` is part of this selection.
    #[must_use]
    pub fn matches(&self, record: &FireRecord) -> bool {
        record.fire_year == self.fire_year
            && record.cause == self.cause
            && record.size_class.label == self.size_class
    }
}

// ── Results ──────────────────────────────────────────────────────────────

/// Descriptive statistics over acreage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcreageStats {
    /// Number of records.
    pub count: u64,
    /// Mean acres.
    pub mean: f64,
    /// Sample standard deviation; `None` below two records.
    pub std: Option<f64>,
    /// Smallest fire.
    pub min: f64,
    /// 25th percentile.
    pub q1: f64,
    /// 50th percentile.
    pub median: f64,
    /// 75th percentile.
    pub q3: f64,
    /// Largest fire.
    pub max: f64,
}

/// Count of records in a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Category label.
    pub category: String,
    /// Number of fires.
    pub count: u64,
}

/// Fire activity in one administrative area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaSummary {
    /// Area label.
    pub area: String,
    /// Number of fires.
    pub fire_count: u64,
    /// Acres burned.
    pub total_acres: f64,
    /// Fraction (0-1) of all acres burned that burned in this area.
    pub acreage_share: f64,
}

/// Fire counts by cause category and by general cause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CauseBreakdown {
    /// Total fires counted.
    pub total: u64,
    /// Counts per canonical cause, most frequent first.
    pub by_cause: Vec<CategoryCount>,
    /// Counts per general cause, most frequent first.
    pub by_general_cause: Vec<CategoryCount>,
}

/// Acreage statistics for one cause within a size class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CauseAcreage {
    /// Canonical cause category.
    pub cause: String,
    /// Statistics over the fires of that cause.
    pub stats: AcreageStats,
}

/// One row of the largest-fires table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LargestFire {
    /// Record identifier.
    pub id: String,
    /// Reporting year.
    pub fire_year: i32,
    /// Incident name.
    pub fire_name: Option<String>,
    /// Protection district.
    pub district: Option<String>,
    /// Acres burned.
    pub size_acres: f64,
    /// Point of origin.
    pub coordinates: Option<Coordinates>,
    /// Canonical cause category.
    pub cause: String,
}

/// A fire plotted on a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    /// Record identifier.
    pub id: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Acres burned (marker weight).
    pub size_acres: f64,
    /// Canonical cause category.
    pub cause: String,
}

/// Bounding box of a set of map points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapBounds {
    /// Southern edge.
    pub min_latitude: f64,
    /// Western edge.
    pub min_longitude: f64,
    /// Northern edge.
    pub max_latitude: f64,
    /// Eastern edge.
    pub max_longitude: f64,
}

/// Everything shown for a single fire year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSnapshot {
    /// Reporting year.
    pub fire_year: i32,
    /// Fires reported that year.
    pub fire_count: u64,
    /// Acres burned that year.
    pub total_acres: f64,
    /// Fires per area, most frequent first.
    pub by_area: Vec<CategoryCount>,
    /// Mappable fires.
    pub points: Vec<MapPoint>,
    /// Extent of `points`.
    pub bounds: Option<MapBounds>,
    /// Centroid of `points`.
    pub center: Option<Coordinates>,
}

/// Totals for one year of a trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearPoint {
    /// Reporting year.
    pub fire_year: i32,
    /// Fires reported.
    pub fire_count: u64,
    /// Acres burned.
    pub total_acres: f64,
    /// Fires per cause category, alphabetical.
    pub by_cause: Vec<CategoryCount>,
}

/// Distinct values available to the dashboard's selectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOptions {
    /// Size class labels present, smallest class first.
    pub size_classes: Vec<String>,
    /// Cause categories present, alphabetical.
    pub causes: Vec<String>,
    /// Years present, ascending.
    pub years: Vec<i32>,
}

/// Acres burned under one fire name within a dashboard selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FireAcreage {
    /// Incident name; `None` collects every unnamed fire.
    pub fire_name: Option<String>,
    /// Number of fires under this name.
    pub fire_count: u64,
    /// Acres burned.
    pub total_acres: f64,
}
