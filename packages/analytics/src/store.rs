//! Immutable handle over a loaded fire collection.

use std::collections::BTreeMap;
use std::sync::Arc;

use fire_stats_analytics_models::{
    AcreageStats, AreaSummary, CategoryCount, CauseAcreage, CauseBreakdown, CompositeKey,
    DashboardOptions, FireAcreage, FireFilter, FireSelection, GroupKey, GroupValue, LargestFire, MapBounds,
    MapPoint, Metric, YearPoint, YearSnapshot,
};
use fire_stats_fire_models::{Coordinates, FireRecord, SizeClassScheme};

use crate::{AnalyticsError, queries, reports, spatial, stats};

/// A loaded collection and the size-class scheme its records were classified
/// with. Cloning is cheap; the records are shared, never copied or mutated.
#[derive(Debug, Clone)]
pub struct FireStore {
    records: Arc<[FireRecord]>,
    scheme: SizeClassScheme,
}

impl FireStore {
    /// Wraps `records`, which must already be classified under `scheme`.
    #[must_use]
    pub fn new(records: Vec<FireRecord>, scheme: SizeClassScheme) -> Self {
        log::debug!("FireStore: {} records, {} size classes", records.len(), scheme.len());
        Self {
            records: records.into(),
            scheme,
        }
    }

    /// Every record, in load order.
    #[must_use]
    pub fn records(&self) -> &[FireRecord] {
        &self.records
    }

    /// The scheme the records are classified with.
    #[must_use]
    pub const fn scheme(&self) -> &SizeClassScheme {
        &self.scheme
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` when the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a record by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&FireRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// A new store with every record reclassified under `scheme`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Unclassifiable`] if a record's acreage is
    /// not covered by `scheme`.
    pub fn recategorize(&self, scheme: SizeClassScheme) -> Result<Self, AnalyticsError> {
        let records = queries::categorize(&self.records, &scheme)?;
        Ok(Self::new(records, scheme))
    }

    /// A new store holding only the records that match `filter`.
    #[must_use]
    pub fn filtered(&self, filter: &FireFilter) -> Self {
        Self::new(queries::filter_by(&self.records, filter), self.scheme.clone())
    }

    // ── Queries ──────────────────────────────────────────────

    /// See [`queries::group_by`].
    #[must_use]
    pub fn group_by(&self, key: GroupKey) -> BTreeMap<GroupValue, Vec<FireRecord>> {
        queries::group_by(&self.records, key)
    }

    /// See [`queries::aggregate`].
    #[must_use]
    pub fn aggregate(&self, key: GroupKey, metric: Metric) -> BTreeMap<GroupValue, f64> {
        queries::aggregate(&self.records, key, metric)
    }

    /// See [`queries::aggregate_by_keys`].
    #[must_use]
    pub fn aggregate_by_keys(
        &self,
        keys: &[GroupKey],
        metric: Metric,
    ) -> BTreeMap<CompositeKey, f64> {
        queries::aggregate_by_keys(&self.records, keys, metric)
    }

    /// See [`queries::count_by`].
    #[must_use]
    pub fn count_by(&self, key: GroupKey) -> BTreeMap<GroupValue, u64> {
        queries::count_by(&self.records, key)
    }

    /// See [`queries::top_n`].
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::EmptyInput`] on an empty store when `n > 0`.
    pub fn top_n(&self, n: usize) -> Result<Vec<FireRecord>, AnalyticsError> {
        queries::top_n(&self.records, n)
    }

    /// See [`queries::filter_by_year`].
    #[must_use]
    pub fn filter_by_year(&self, year: i32) -> Vec<FireRecord> {
        queries::filter_by_year(&self.records, year)
    }

    /// See [`queries::with_coordinates`].
    #[must_use]
    pub fn with_coordinates(&self) -> Vec<FireRecord> {
        queries::with_coordinates(&self.records)
    }

    /// See [`stats::describe`].
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::EmptyInput`] on an empty store.
    pub fn describe(&self) -> Result<AcreageStats, AnalyticsError> {
        stats::describe(&self.records)
    }

    /// See [`stats::describe_by`].
    #[must_use]
    pub fn describe_by(&self, key: GroupKey) -> BTreeMap<GroupValue, AcreageStats> {
        stats::describe_by(&self.records, key)
    }

    // ── Reports ──────────────────────────────────────────────

    /// See [`reports::area_summaries`].
    #[must_use]
    pub fn area_summaries(&self) -> Vec<AreaSummary> {
        reports::area_summaries(&self.records)
    }

    /// See [`reports::cause_breakdown`].
    #[must_use]
    pub fn cause_breakdown(&self) -> CauseBreakdown {
        reports::cause_breakdown(&self.records)
    }

    /// Counts for every class of this store's scheme.
    #[must_use]
    pub fn size_class_counts(&self) -> Vec<CategoryCount> {
        reports::size_class_counts(&self.records, &self.scheme)
    }

    /// See [`reports::class_acreage_by_cause`].
    #[must_use]
    pub fn class_acreage_by_cause(&self, size_class: &str) -> Vec<CauseAcreage> {
        reports::class_acreage_by_cause(&self.records, size_class)
    }

    /// See [`reports::largest_fires`].
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::EmptyInput`] on an empty store when `n > 0`.
    pub fn largest_fires(&self, n: usize) -> Result<Vec<LargestFire>, AnalyticsError> {
        reports::largest_fires(&self.records, n)
    }

    /// See [`reports::year_snapshot`].
    #[must_use]
    pub fn year_snapshot(&self, year: i32) -> YearSnapshot {
        reports::year_snapshot(&self.records, year)
    }

    /// See [`reports::yearly_trend`].
    #[must_use]
    pub fn yearly_trend(&self) -> Vec<YearPoint> {
        reports::yearly_trend(&self.records)
    }

    /// See [`reports::dashboard_options`].
    #[must_use]
    pub fn dashboard_options(&self) -> DashboardOptions {
        reports::dashboard_options(&self.records)
    }

    /// See [`reports::dashboard_selection`].
    #[must_use]
    pub fn dashboard_selection(&self, selection: &FireSelection) -> Vec<FireAcreage> {
        reports::dashboard_selection(&self.records, selection)
    }

    // ── Spatial ──────────────────────────────────────────────

    /// See [`spatial::map_points`].
    #[must_use]
    pub fn map_points(&self) -> Vec<MapPoint> {
        spatial::map_points(&self.records)
    }

    /// See [`spatial::map_bounds`].
    #[must_use]
    pub fn map_bounds(&self) -> Option<MapBounds> {
        spatial::map_bounds(&self.records)
    }

    /// See [`spatial::map_center`].
    #[must_use]
    pub fn map_center(&self) -> Option<Coordinates> {
        spatial::map_center(&self.records)
    }
}
