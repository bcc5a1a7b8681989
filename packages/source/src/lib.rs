#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Fire dataset definitions and the CSV loader.
//!
//! Each published dataset is described by a [`DatasetDefinition`] (embedded
//! TOML, see [`registry`]). [`DatasetDefinition::load`] reads the export once
//! and returns validated [`fire_stats_fire_models::FireRecord`]s together with
//! a [`fire_stats_source_models::LoadReport`].

pub mod cause_mapping;
pub mod csv_file;
pub mod dataset_def;
pub mod parsing;
pub mod registry;

pub use csv_file::LoadedDataset;
pub use dataset_def::{DatasetDefinition, FieldMapping, LicenseInfo, read_dataset_toml};
use fire_stats_source_models::RowIssue;

/// Errors that can occur while loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// I/O error (file open/read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV framing error (bad quoting, non-UTF-8 header).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The dataset definition TOML is malformed or invalid.
    #[error("Dataset definition error: {0}")]
    Definition(#[from] toml::de::Error),

    /// A configured column is not in the header row.
    #[error("Column '{column}' is not in the header")]
    MissingColumn {
        /// The configured column name.
        column: String,
    },

    /// A row is malformed and the row policy is strict.
    #[error("Line {line}: {issue}")]
    MalformedRow {
        /// One-based line number.
        line: u64,
        /// What was wrong.
        issue: RowIssue,
    },

    /// The source has no header or no data rows.
    #[error("Source contains no data rows")]
    EmptySource,
}
