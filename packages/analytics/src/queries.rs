//! Core record queries: categorize, group, aggregate, rank and filter.

use std::collections::BTreeMap;

use fire_stats_analytics_models::{CompositeKey, FireFilter, GroupKey, GroupValue, Metric};
use fire_stats_fire_models::{FireRecord, SizeClassScheme};

use crate::AnalyticsError;

/// Default ranking size.
pub const DEFAULT_TOP_N: usize = 20;

/// Re-derives every record's size class under `scheme`.
///
/// # Errors
///
/// Returns [`AnalyticsError::Unclassifiable`] for a record whose acreage is
/// negative or not finite.
pub fn categorize(
    records: &[FireRecord],
    scheme: &SizeClassScheme,
) -> Result<Vec<FireRecord>, AnalyticsError> {
    records
        .iter()
        .map(|record| {
            let size_class =
                scheme
                    .classify(record.size_acres)
                    .ok_or_else(|| AnalyticsError::Unclassifiable {
                        id: record.id.clone(),
                        acres: record.size_acres,
                    })?;
            Ok(FireRecord {
                size_class,
                ..record.clone()
            })
        })
        .collect()
}

/// Partitions records by one key. Every record lands in exactly one group
/// and input order is kept within each group.
#[must_use]
pub fn group_by(records: &[FireRecord], key: GroupKey) -> BTreeMap<GroupValue, Vec<FireRecord>> {
    let mut groups: BTreeMap<GroupValue, Vec<FireRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry(key.value_of(record))
            .or_default()
            .push(record.clone());
    }
    groups
}

/// Partitions records by a composite key, one value per entry of `keys`.
#[must_use]
pub fn group_by_keys(
    records: &[FireRecord],
    keys: &[GroupKey],
) -> BTreeMap<CompositeKey, Vec<FireRecord>> {
    let mut groups: BTreeMap<CompositeKey, Vec<FireRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry(CompositeKey::of(keys, record))
            .or_default()
            .push(record.clone());
    }
    groups
}

/// Computes `metric` over one group.
#[allow(clippy::cast_precision_loss)]
fn evaluate(metric: Metric, group: &[FireRecord]) -> f64 {
    let total = || group.iter().map(|r| r.size_acres).sum::<f64>();
    match metric {
        Metric::Count => group.len() as f64,
        Metric::TotalAcres => total(),
        Metric::MeanAcres => total() / group.len() as f64,
        Metric::MaxAcres => group
            .iter()
            .map(|r| r.size_acres)
            .fold(f64::NEG_INFINITY, f64::max),
    }
}

/// Computes `metric` per group of `key`. Groups only exist for values some
/// record carries, so no group is ever empty and an empty input yields an
/// empty map.
#[must_use]
pub fn aggregate(records: &[FireRecord], key: GroupKey, metric: Metric) -> BTreeMap<GroupValue, f64> {
    group_by(records, key)
        .into_iter()
        .map(|(value, group)| (value, evaluate(metric, &group)))
        .collect()
}

/// Computes `metric` per composite group.
#[must_use]
pub fn aggregate_by_keys(
    records: &[FireRecord],
    keys: &[GroupKey],
    metric: Metric,
) -> BTreeMap<CompositeKey, f64> {
    group_by_keys(records, keys)
        .into_iter()
        .map(|(values, group)| (values, evaluate(metric, &group)))
        .collect()
}

/// Number of records per group of `key`.
#[must_use]
pub fn count_by(records: &[FireRecord], key: GroupKey) -> BTreeMap<GroupValue, u64> {
    let mut counts: BTreeMap<GroupValue, u64> = BTreeMap::new();
    for record in records {
        *counts.entry(key.value_of(record)).or_default() += 1;
    }
    counts
}

/// The `n` largest fires by acreage, largest first. Ties are broken by
/// identifier, ascending.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyInput`] when `records` is empty and `n` is
/// non-zero.
pub fn top_n(records: &[FireRecord], n: usize) -> Result<Vec<FireRecord>, AnalyticsError> {
    if n == 0 {
        return Ok(Vec::new());
    }
    if records.is_empty() {
        return Err(AnalyticsError::EmptyInput { operation: "top_n" });
    }

    let mut ranked: Vec<&FireRecord> = records.iter().collect();
    ranked.sort_by(|a, b| {
        b.size_acres
            .total_cmp(&a.size_acres)
            .then_with(|| a.id.cmp(&b.id))
    });

    Ok(ranked.into_iter().take(n).cloned().collect())
}

/// Records reported in `year`, in input order.
#[must_use]
pub fn filter_by_year(records: &[FireRecord], year: i32) -> Vec<FireRecord> {
    records
        .iter()
        .filter(|r| r.fire_year == year)
        .cloned()
        .collect()
}

/// Records matching every criterion of `filter`, in input order.
#[must_use]
pub fn filter_by(records: &[FireRecord], filter: &FireFilter) -> Vec<FireRecord> {
    records
        .iter()
        .filter(|r| filter.matches(r))
        .cloned()
        .collect()
}

/// Records with a point of origin.
#[must_use]
pub fn with_coordinates(records: &[FireRecord]) -> Vec<FireRecord> {
    records
        .iter()
        .filter(|r| r.location.coordinates.is_some())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use fire_stats_fire_models::SizeClassBound;

    use super::*;
    use crate::fixtures::{fire, sample};

    fn four_class() -> SizeClassScheme {
        let bound = |label: &str, min_acres: f64| SizeClassBound {
            label: label.to_string(),
            min_acres,
            exclusive_min: false,
        };
        SizeClassScheme::try_from(vec![
            bound("A", 0.0),
            bound("B", 10.0),
            bound("C", 100.0),
            bound("D", 1000.0),
        ])
        .unwrap()
    }

    #[test]
    fn categorize_example_acreages() {
        let records: Vec<FireRecord> = [0.5, 15.0, 120.0, 1500.0]
            .iter()
            .enumerate()
            .map(|(i, acres)| fire(&i.to_string(), 2020, "Human", *acres))
            .collect();

        let categorized = categorize(&records, &four_class()).unwrap();
        let labels: Vec<&str> = categorized
            .iter()
            .map(|r| r.size_class.label.as_str())
            .collect();
        assert_eq!(labels, ["A", "B", "C", "D"]);

        // Source records untouched.
        assert_eq!(records[1].size_class.label, "C");
    }

    #[test]
    fn categorize_is_pure() {
        let records = sample();
        let scheme = four_class();
        assert_eq!(
            categorize(&records, &scheme).unwrap(),
            categorize(&records, &scheme).unwrap()
        );
    }

    #[test]
    fn categorize_rejects_bad_acreage() {
        let mut bad = fire("x", 2020, "Human", 1.0);
        bad.size_acres = -1.0;
        assert_eq!(
            categorize(&[bad], &four_class()),
            Err(AnalyticsError::Unclassifiable {
                id: "x".to_string(),
                acres: -1.0
            })
        );
    }

    #[test]
    fn group_by_cause_is_a_partition() {
        let records = sample();
        let groups = group_by(&records, GroupKey::Cause);

        let mut seen = BTreeSet::new();
        let mut total = 0;
        for (value, group) in &groups {
            assert!(!group.is_empty());
            for record in group {
                assert_eq!(GroupKey::Cause.value_of(record), *value);
                assert!(seen.insert(record.id.clone()), "{} twice", record.id);
            }
            total += group.len();
        }
        assert_eq!(total, records.len());
        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn group_by_missing_optional_field() {
        let groups = group_by(&sample(), GroupKey::FireName);
        assert_eq!(groups[&GroupValue::Missing].len(), 4);
        assert_eq!(groups[&GroupValue::from("Biscuit")].len(), 1);
        assert_eq!(groups.keys().last(), Some(&GroupValue::Missing));
    }

    #[test]
    fn group_by_composite_key() {
        let groups = group_by_keys(&sample(), &[GroupKey::FireYear, GroupKey::Cause]);
        let key = CompositeKey(vec![GroupValue::Year(2022), GroupValue::from("Human")]);
        assert_eq!(groups[&key].len(), 2);
        assert_eq!(groups.values().map(Vec::len).sum::<usize>(), 6);
    }

    #[test]
    fn aggregate_count_by_cause() {
        let records = vec![
            fire("1", 2020, "lightning", 1.0),
            fire("2", 2020, "human", 2.0),
            fire("3", 2020, "lightning", 3.0),
        ];
        let counts = aggregate(&records, GroupKey::Cause, Metric::Count);
        assert_eq!(counts.len(), 2);
        assert!((counts[&GroupValue::from("lightning")] - 2.0).abs() < f64::EPSILON);
        assert!((counts[&GroupValue::from("human")] - 1.0).abs() < f64::EPSILON);

        let by_count = count_by(&records, GroupKey::Cause);
        assert_eq!(by_count[&GroupValue::from("lightning")], 2);
    }

    #[test]
    fn aggregate_acreage_metrics() {
        let records = vec![
            fire("1", 2020, "Lightning", 1.0),
            fire("2", 2020, "Lightning", 3.0),
            fire("3", 2021, "Human", 10.0),
        ];
        let total = aggregate(&records, GroupKey::Cause, Metric::TotalAcres);
        let mean = aggregate(&records, GroupKey::Cause, Metric::MeanAcres);
        let max = aggregate(&records, GroupKey::Cause, Metric::MaxAcres);
        assert!((total[&GroupValue::from("Lightning")] - 4.0).abs() < f64::EPSILON);
        assert!((mean[&GroupValue::from("Lightning")] - 2.0).abs() < f64::EPSILON);
        assert!((max[&GroupValue::from("Human")] - 10.0).abs() < f64::EPSILON);

        let by_year = aggregate_by_keys(&records, &[GroupKey::FireYear], Metric::Count);
        assert!((by_year[&CompositeKey(vec![GroupValue::Year(2020)])] - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn grouped_results_serialize_as_json_objects() {
        let by_class = aggregate(&sample(), GroupKey::SizeClass, Metric::Count);
        assert_eq!(
            serde_json::to_value(&by_class).unwrap(),
            serde_json::json!({"A": 2.0, "C": 1.0, "E": 1.0, "F": 1.0, "G": 1.0})
        );

        let by_name = count_by(&sample(), GroupKey::FireName);
        assert_eq!(
            serde_json::to_value(&by_name).unwrap(),
            serde_json::json!({"(none)": 4, "Biscuit": 1, "Cedar Creek": 1})
        );

        let by_year_cause = aggregate_by_keys(
            &sample(),
            &[GroupKey::FireYear, GroupKey::Cause],
            Metric::TotalAcres,
        );
        let json = serde_json::to_value(&by_year_cause).unwrap();
        assert_eq!(json["2022 | Human"], serde_json::json!(1200.1));
        assert_eq!(json["2015 | Under Investigation"], serde_json::json!(300.0));

        let groups = serde_json::to_value(group_by(&sample(), GroupKey::FireYear)).unwrap();
        assert_eq!(groups["2015"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn aggregate_of_nothing_is_empty() {
        assert!(aggregate(&[], GroupKey::Cause, Metric::MeanAcres).is_empty());
    }

    #[test]
    fn top_n_orders_by_acres_then_id() {
        let records = vec![
            fire("b", 2020, "Human", 5.0),
            fire("a", 2020, "Human", 5.0),
            fire("c", 2020, "Human", 50.0),
            fire("d", 2020, "Human", 0.5),
        ];
        let top = top_n(&records, 3).unwrap();
        let ids: Vec<&str> = top.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }

    #[test]
    fn top_n_size_and_order() {
        let records: Vec<FireRecord> = (0..30)
            .map(|i| fire(&format!("{i:02}"), 2020, "Human", f64::from((i * 37) % 23)))
            .collect();
        let top = top_n(&records, DEFAULT_TOP_N).unwrap();
        assert_eq!(top.len(), DEFAULT_TOP_N);
        assert!(top.windows(2).all(|w| w[0].size_acres >= w[1].size_acres));

        let few = top_n(&records[..5], DEFAULT_TOP_N).unwrap();
        assert_eq!(few.len(), 5);
    }

    #[test]
    fn top_n_empty_input() {
        assert_eq!(
            top_n(&[], 20),
            Err(AnalyticsError::EmptyInput { operation: "top_n" })
        );
        assert!(top_n(&[], 0).unwrap().is_empty());
        assert!(top_n(&sample(), 0).unwrap().is_empty());
    }

    #[test]
    fn filter_by_year_is_exact_subset() {
        let records = sample();
        let fires_2022 = filter_by_year(&records, 2022);
        assert_eq!(fires_2022.len(), 3);
        assert!(fires_2022.iter().all(|r| r.fire_year == 2022));
        assert!(filter_by_year(&records, 1999).is_empty());
    }

    #[test]
    fn filter_by_criteria() {
        let records = sample();
        let filter = FireFilter {
            year_from: Some(2015),
            cause: Some("Human".to_string()),
            ..FireFilter::default()
        };
        let ids: Vec<String> = filter_by(&records, &filter)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, ["2", "4", "5"]);
        assert_eq!(filter_by(&records, &FireFilter::default()).len(), records.len());
    }

    #[test]
    fn mappable_subset() {
        let mapped = with_coordinates(&sample());
        assert_eq!(mapped.len(), 3);
        assert!(mapped.iter().all(|r| r.location.coordinates.is_some()));
    }
}
