//! Size-class schemes.
//!
//! A [`SizeClassScheme`] is an ordered list of lower bounds that partitions
//! `[0, inf)` into non-overlapping, exhaustive acreage ranges. The default is
//! the NWCG A-G scheme used by most US fire occurrence datasets.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A size class assigned to a fire.
///
/// Ordering follows the class's position in its scheme, so sorting by
/// `SizeClass` goes from smallest to largest fires.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeClass {
    /// Zero-based position of the class within its scheme.
    pub rank: usize,
    /// Class label (e.g. `"A"`).
    pub label: String,
}

impl std::fmt::Display for SizeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}

/// Lower bound of one class in a [`SizeClassScheme`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeClassBound {
    /// Class label.
    pub label: String,
    /// Smallest acreage belonging to this class.
    pub min_acres: f64,
    /// When `true`, an acreage exactly equal to `min_acres` belongs to the
    /// previous class instead.
    #[serde(default)]
    pub exclusive_min: bool,
}

impl SizeClassBound {
    fn new(label: &str, min_acres: f64, exclusive_min: bool) -> Self {
        Self {
            label: label.to_string(),
            min_acres,
            exclusive_min,
        }
    }

    fn admits(&self, acres: f64) -> bool {
        if self.exclusive_min {
            acres > self.min_acres
        } else {
            acres >= self.min_acres
        }
    }
}

/// Reasons a list of bounds does not form a valid partition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemeError {
    /// No classes were given.
    #[error("size class scheme has no classes")]
    Empty,

    /// The first class does not start at zero inclusive.
    #[error("first size class '{label}' must start at 0 acres inclusive")]
    FirstBoundNotZero {
        /// Label of the offending class.
        label: String,
    },

    /// A bound is NaN or infinite.
    #[error("size class '{label}' has a non-finite lower bound")]
    NonFinite {
        /// Label of the offending class.
        label: String,
    },

    /// Bounds are not strictly increasing.
    #[error("size class '{label}' starts at {min_acres} acres, not above the previous class")]
    NotIncreasing {
        /// Label of the offending class.
        label: String,
        /// Its lower bound.
        min_acres: f64,
    },

    /// Two classes share a label.
    #[error("duplicate size class label '{label}'")]
    DuplicateLabel {
        /// The repeated label.
        label: String,
    },
}

/// An ordered partition of `[0, inf)` into labelled acreage classes.
///
/// Construct through [`TryFrom`] (or deserialization, which goes through the
/// same validation) so every scheme in circulation is a true partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SizeClassBound>", into = "Vec<SizeClassBound>")]
pub struct SizeClassScheme {
    bounds: Vec<SizeClassBound>,
}

impl TryFrom<Vec<SizeClassBound>> for SizeClassScheme {
    type Error = SchemeError;

    fn try_from(bounds: Vec<SizeClassBound>) -> Result<Self, Self::Error> {
        let first = bounds.first().ok_or(SchemeError::Empty)?;
        if first.min_acres != 0.0 || first.exclusive_min {
            return Err(SchemeError::FirstBoundNotZero {
                label: first.label.clone(),
            });
        }

        for (i, bound) in bounds.iter().enumerate() {
            if !bound.min_acres.is_finite() {
                return Err(SchemeError::NonFinite {
                    label: bound.label.clone(),
                });
            }
            if i > 0 && bound.min_acres <= bounds[i - 1].min_acres {
                return Err(SchemeError::NotIncreasing {
                    label: bound.label.clone(),
                    min_acres: bound.min_acres,
                });
            }
            if bounds[..i].iter().any(|b| b.label == bound.label) {
                return Err(SchemeError::DuplicateLabel {
                    label: bound.label.clone(),
                });
            }
        }

        Ok(Self { bounds })
    }
}

impl From<SizeClassScheme> for Vec<SizeClassBound> {
    fn from(scheme: SizeClassScheme) -> Self {
        scheme.bounds
    }
}

impl Default for SizeClassScheme {
    /// NWCG fire size classes: A ≤ 0.25 < B < 10 ≤ C < 100 ≤ D < 300 ≤ E
    /// < 1000 ≤ F < 5000 ≤ G.
    fn default() -> Self {
        Self {
            bounds: vec![
                SizeClassBound::new("A", 0.0, false),
                SizeClassBound::new("B", 0.25, true),
                SizeClassBound::new("C", 10.0, false),
                SizeClassBound::new("D", 100.0, false),
                SizeClassBound::new("E", 300.0, false),
                SizeClassBound::new("F", 1000.0, false),
                SizeClassBound::new("G", 5000.0, false),
            ],
        }
    }
}

impl SizeClassScheme {
    /// Assigns the class for an acreage.
    ///
    /// Returns `None` for negative or non-finite input; every other value
    /// maps to exactly one class.
    #[must_use]
    pub fn classify(&self, acres: f64) -> Option<SizeClass> {
        if !acres.is_finite() || acres < 0.0 {
            return None;
        }
        // Bounds strictly increase, so the admitting bounds form a prefix.
        let rank = self.bounds.iter().rposition(|b| b.admits(acres))?;
        Some(SizeClass {
            rank,
            label: self.bounds[rank].label.clone(),
        })
    }

    /// Looks up a class by label.
    #[must_use]
    pub fn class(&self, label: &str) -> Option<SizeClass> {
        self.bounds
            .iter()
            .position(|b| b.label == label)
            .map(|rank| SizeClass {
                rank,
                label: label.to_string(),
            })
    }

    /// All classes, smallest first.
    #[must_use]
    pub fn classes(&self) -> Vec<SizeClass> {
        self.bounds
            .iter()
            .enumerate()
            .map(|(rank, b)| SizeClass {
                rank,
                label: b.label.clone(),
            })
            .collect()
    }

    /// The raw bounds, smallest first.
    #[must_use]
    pub fn bounds(&self) -> &[SizeClassBound] {
        &self.bounds
    }

    /// Number of classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    /// Always `false`; a validated scheme has at least one class.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_class() -> SizeClassScheme {
        SizeClassScheme::try_from(vec![
            SizeClassBound::new("A", 0.0, false),
            SizeClassBound::new("B", 10.0, false),
            SizeClassBound::new("C", 100.0, false),
            SizeClassBound::new("D", 1000.0, false),
        ])
        .unwrap()
    }

    #[test]
    fn classifies_example_acreages() {
        let scheme = four_class();
        let labels: Vec<String> = [0.5, 15.0, 120.0, 1500.0]
            .iter()
            .map(|a| scheme.classify(*a).unwrap().label)
            .collect();
        assert_eq!(labels, ["A", "B", "C", "D"]);
    }

    #[test]
    fn breakpoints_belong_to_upper_class_unless_exclusive() {
        let scheme = four_class();
        assert_eq!(scheme.classify(10.0).unwrap().label, "B");
        assert_eq!(scheme.classify(9.999).unwrap().label, "A");

        let nwcg = SizeClassScheme::default();
        assert_eq!(nwcg.classify(0.25).unwrap().label, "A");
        assert_eq!(nwcg.classify(0.26).unwrap().label, "B");
        assert_eq!(nwcg.classify(10.0).unwrap().label, "C");
        assert_eq!(nwcg.classify(4999.9).unwrap().label, "F");
        assert_eq!(nwcg.classify(499_945.0).unwrap().label, "G");
    }

    #[test]
    fn partition_is_exhaustive_and_monotonic() {
        let scheme = SizeClassScheme::default();
        let mut samples: Vec<f64> = (0..20_000).map(|i| f64::from(i) * 0.37).collect();
        for bound in scheme.bounds() {
            samples.push(bound.min_acres);
            samples.push(bound.min_acres + 1e-9);
            if bound.min_acres > 0.0 {
                samples.push(bound.min_acres - 1e-9);
            }
        }
        samples.push(f64::MAX);
        samples.sort_by(f64::total_cmp);

        let mut last_rank = 0;
        for acres in samples {
            let class = scheme
                .classify(acres)
                .unwrap_or_else(|| panic!("{acres} has no class"));
            assert!(class.rank >= last_rank, "{acres} went back to {class}");
            last_rank = class.rank;
            // Deterministic: a second call agrees.
            assert_eq!(scheme.classify(acres), Some(class));
        }
        assert_eq!(last_rank, scheme.len() - 1);
    }

    #[test]
    fn rejects_invalid_input() {
        let scheme = SizeClassScheme::default();
        assert!(scheme.classify(-0.1).is_none());
        assert!(scheme.classify(f64::NAN).is_none());
        assert!(scheme.classify(f64::INFINITY).is_none());
    }

    #[test]
    fn validation_errors() {
        assert_eq!(SizeClassScheme::try_from(vec![]), Err(SchemeError::Empty));
        assert!(matches!(
            SizeClassScheme::try_from(vec![SizeClassBound::new("A", 1.0, false)]),
            Err(SchemeError::FirstBoundNotZero { .. })
        ));
        assert!(matches!(
            SizeClassScheme::try_from(vec![
                SizeClassBound::new("A", 0.0, false),
                SizeClassBound::new("B", 10.0, false),
                SizeClassBound::new("C", 10.0, false),
            ]),
            Err(SchemeError::NotIncreasing { .. })
        ));
        assert!(matches!(
            SizeClassScheme::try_from(vec![
                SizeClassBound::new("A", 0.0, false),
                SizeClassBound::new("A", 10.0, false),
            ]),
            Err(SchemeError::DuplicateLabel { .. })
        ));
        assert!(matches!(
            SizeClassScheme::try_from(vec![
                SizeClassBound::new("A", 0.0, false),
                SizeClassBound::new("B", f64::INFINITY, false),
            ]),
            Err(SchemeError::NonFinite { .. })
        ));
    }

    #[test]
    fn deserializes_through_validation() {
        #[derive(Deserialize)]
        struct Wrapper {
            size_classes: SizeClassScheme,
        }

        let ok: Wrapper = toml::from_str(
            r#"
            [[size_classes]]
            label = "Small"
            min_acres = 0.0

            [[size_classes]]
            label = "Large"
            min_acres = 100.0
            "#,
        )
        .unwrap();
        assert_eq!(ok.size_classes.len(), 2);
        assert_eq!(ok.size_classes.classify(100.0).unwrap().label, "Large");

        let bad = toml::from_str::<Wrapper>(
            r#"
            [[size_classes]]
            label = "Small"
            min_acres = 5.0
            "#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn class_lookup_and_ordering() {
        let scheme = SizeClassScheme::default();
        let a = scheme.class("A").unwrap();
        let g = scheme.class("G").unwrap();
        assert!(a < g);
        assert!(scheme.class("Z").is_none());
        assert_eq!(scheme.classes().len(), 7);
        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            serde_json::json!({"rank": 0, "label": "A"})
        );
    }
}
