#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Fire incident record types shared across the fire-stats workspace.
//!
//! Every dataset loader produces [`FireRecord`]s. Size classes come from a
//! configurable [`SizeClassScheme`] and cause categories from a configurable
//! [`CauseTaxonomy`], so neither the breakpoints nor the cause labels are
//! baked into the record type.

pub mod cause;
pub mod size_class;

use chrono::{Datelike as _, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub use cause::{CauseRule, CauseTaxonomy};
pub use size_class::{SchemeError, SizeClass, SizeClassBound, SizeClassScheme};

/// A WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Coordinates {
    /// Builds a point, returning `None` when either component is outside the
    /// WGS84 range or not finite.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude)
        {
            Some(Self {
                latitude,
                longitude,
            })
        } else {
            None
        }
    }
}

/// Where a fire burned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Administrative area (e.g. `"EOA"` for the Eastern Oregon Area).
    pub area: String,
    /// Protection district name.
    pub district: Option<String>,
    /// Protection unit name.
    pub unit: Option<String>,
    /// County name.
    pub county: Option<String>,
    /// Point of origin, when the source recorded one.
    pub coordinates: Option<Coordinates>,
}

/// One wildfire incident.
///
/// Records are created once by a loader and never mutated afterwards.
/// Derived views (re-categorization, filtering) build new records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FireRecord {
    /// Identifier from the source dataset, unique within a collection.
    pub id: String,
    /// Reporting year.
    pub fire_year: i32,
    /// Incident name, if one was assigned.
    pub fire_name: Option<String>,
    /// Where the fire burned.
    pub location: Location,
    /// Canonical cause category from the dataset's [`CauseTaxonomy`].
    pub cause: String,
    /// General cause detail (e.g. `"Debris Burning"`).
    pub general_cause: Option<String>,
    /// Specific cause detail.
    pub specific_cause: Option<String>,
    /// Estimated total acres burned. Always finite and non-negative.
    pub size_acres: f64,
    /// `true` when `size_acres` was filled in by class-mean imputation
    /// rather than read from the source.
    pub acres_imputed: bool,
    /// Size class derived from `size_acres`.
    pub size_class: SizeClass,
    /// When the fire ignited.
    pub ignited_at: Option<NaiveDateTime>,
    /// When the fire was reported.
    pub reported_at: Option<NaiveDateTime>,
    /// When the fire was discovered.
    pub discovered_at: Option<NaiveDateTime>,
    /// When the fire was declared controlled.
    pub controlled_at: Option<NaiveDateTime>,
}

impl FireRecord {
    /// The date whose year must agree with [`Self::fire_year`]: ignition,
    /// falling back to discovery.
    #[must_use]
    pub fn anchor_date(&self) -> Option<NaiveDate> {
        self.ignited_at
            .or(self.discovered_at)
            .map(|dt| dt.date())
    }

    /// Returns `false` only when an anchor date exists and its year differs
    /// from the reporting year.
    #[must_use]
    pub fn year_is_consistent(&self) -> bool {
        self.anchor_date()
            .is_none_or(|date| date.year() == self.fire_year)
    }

    /// Hours between discovery and control, when both are known.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hours_to_control(&self) -> Option<f64> {
        let start = self.discovered_at?;
        let end = self.controlled_at?;
        let minutes = (end - start).num_minutes();
        if minutes < 0 {
            return None;
        }
        Some(minutes as f64 / 60.0)
    }

    /// Display name, falling back to the identifier for unnamed fires.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.fire_name.as_deref().unwrap_or(&self.id)
    }
}
