#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Query engine over an in-memory collection of fire records.
//!
//! Every function is pure: it takes a slice of
//! [`fire_stats_fire_models::FireRecord`]s and returns new owned values, so
//! the source collection is never mutated. [`FireStore`] bundles a loaded
//! collection with its size-class scheme for callers that prefer a handle.

pub mod queries;
pub mod reports;
pub mod spatial;
pub mod stats;
pub mod store;

#[cfg(test)]
mod fixtures;

pub use store::FireStore;
use thiserror::Error;

/// Errors that can occur during analytics operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// The operation needs at least one record.
    #[error("{operation} requires at least one record")]
    EmptyInput {
        /// Name of the operation.
        operation: &'static str,
    },

    /// A record's acreage falls outside every size class.
    #[error("Record '{id}' has acreage {acres}, which no size class covers")]
    Unclassifiable {
        /// Record identifier.
        id: String,
        /// The offending acreage.
        acres: f64,
    },
}
