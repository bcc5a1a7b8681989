#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Load policies and the load report produced when reading a fire dataset.
//!
//! A load never coerces bad values. Each malformed row is described by a
//! [`RowIssue`]; the [`RowPolicy`] decides whether that aborts the load or is
//! recorded in the [`LoadReport`] and skipped.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// What to do when a row is malformed.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RowPolicy {
    /// Abort the load on the first malformed row.
    #[default]
    Strict,
    /// Exclude malformed rows and report them.
    Skip,
}

/// What to do when a row has a blank acreage.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MissingAcresPolicy {
    /// Blank acreage is a malformed row.
    #[default]
    Reject,
    /// Fill blank acreage with the mean acreage of rows sharing the dataset's
    /// published size class. The record is flagged as imputed.
    ImputeClassMean,
}

/// Why a single row could not become a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RowIssue {
    /// A field is not valid UTF-8.
    #[error("column '{column}' is not valid UTF-8")]
    InvalidEncoding {
        /// The offending column.
        column: String,
    },

    /// The row has a different number of fields than the header.
    #[error("expected {expected} fields, found {found}")]
    WrongFieldCount {
        /// Header width.
        expected: usize,
        /// Row width.
        found: usize,
    },

    /// A required column was blank.
    #[error("missing required field '{column}'")]
    MissingField {
        /// Source column name.
        column: String,
    },

    /// A numeric column did not parse.
    #[error("'{column}' is not a number: '{value}'")]
    InvalidNumber {
        /// Source column name.
        column: String,
        /// Raw cell text.
        value: String,
    },

    /// Acreage was negative, NaN or infinite.
    #[error("acreage {value} is not a finite non-negative number")]
    InvalidAcres {
        /// Parsed value.
        value: f64,
    },

    /// A date column did not match any configured format.
    #[error("'{column}' is not a recognized date: '{value}'")]
    InvalidDate {
        /// Source column name.
        column: String,
        /// Raw cell text.
        value: String,
    },

    /// The reporting year disagrees with the anchor date.
    #[error("fire year {fire_year} does not match anchor date year {date_year}")]
    YearMismatch {
        /// Reporting year from the row.
        fire_year: i32,
        /// Year of the ignition/discovery date.
        date_year: i32,
    },

    /// Only one of latitude/longitude was present, or they were out of range.
    #[error("invalid coordinates: latitude '{latitude}', longitude '{longitude}'")]
    InvalidCoordinates {
        /// Raw latitude text.
        latitude: String,
        /// Raw longitude text.
        longitude: String,
    },

    /// The identifier was already used by an earlier row.
    #[error("duplicate identifier '{id}'")]
    DuplicateId {
        /// The repeated identifier.
        id: String,
    },

    /// Acreage was blank and no rows in the same source class could supply a
    /// mean.
    #[error("acreage is blank and size class '{size_class}' has no donor rows")]
    NoImputationDonors {
        /// Source size-class label (empty when the row had none).
        size_class: String,
    },
}

/// A row excluded from the load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowRejection {
    /// One-based line number in the source file (the header is line 1).
    pub line: u64,
    /// Identifier from the row, if it had one.
    pub id: Option<String>,
    /// What was wrong.
    pub issue: RowIssue,
}

/// Summary of a completed load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    /// Data rows read, excluding the header.
    pub rows_read: u64,
    /// Records produced.
    pub loaded: u64,
    /// Records whose acreage was imputed.
    pub imputed: u64,
    /// Rows excluded under [`RowPolicy::Skip`].
    pub rejections: Vec<RowRejection>,
}

impl LoadReport {
    /// Number of excluded rows.
    #[must_use]
    pub fn rejected(&self) -> usize {
        self.rejections.len()
    }

    /// `true` when every row became a record.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policies_parse_from_config_strings() {
        assert_eq!("skip".parse::<RowPolicy>().unwrap(), RowPolicy::Skip);
        assert_eq!(
            "impute_class_mean".parse::<MissingAcresPolicy>().unwrap(),
            MissingAcresPolicy::ImputeClassMean
        );
        assert_eq!(RowPolicy::default(), RowPolicy::Strict);
        assert_eq!(MissingAcresPolicy::default().as_ref(), "reject");
    }

    #[test]
    fn row_issue_serializes_tagged() {
        let issue = RowIssue::InvalidNumber {
            column: "EstTotalAcres".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&issue).unwrap(),
            serde_json::json!({
                "kind": "invalidNumber",
                "column": "EstTotalAcres",
                "value": "abc"
            })
        );
        assert_eq!(issue.to_string(), "'EstTotalAcres' is not a number: 'abc'");
    }

    #[test]
    fn report_counts() {
        let mut report = LoadReport::default();
        assert!(report.is_clean());
        report.rejections.push(RowRejection {
            line: 3,
            id: None,
            issue: RowIssue::MissingField {
                column: "Serial".to_string(),
            },
        });
        assert_eq!(report.rejected(), 1);
        assert!(!report.is_clean());
    }
}
