//! Dataset registry. Loads every dataset definition from embedded TOML configs.
//!
//! Each `.toml` file in `packages/source/datasets/` is baked into the binary
//! at compile time via [`include_str!`]. Supporting another published fire
//! dataset is a matter of adding a TOML file and listing it below.

use crate::dataset_def::{DatasetDefinition, parse_dataset_toml};

/// TOML configs embedded at compile time.
const DATASET_TOMLS: &[(&str, &str)] = &[(
    "odf_fire_occurrence",
    include_str!("../datasets/odf_fire_occurrence.toml"),
)];

/// Total number of configured datasets (used in tests).
#[cfg(test)]
const EXPECTED_DATASET_COUNT: usize = 1;

/// Returns all configured dataset definitions, parsed from embedded TOML.
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time guarantee
/// since the configs are embedded).
#[must_use]
pub fn all_datasets() -> Vec<DatasetDefinition> {
    DATASET_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_dataset_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Returns the definition with the given id.
#[must_use]
pub fn dataset(id: &str) -> Option<DatasetDefinition> {
    all_datasets().into_iter().find(|d| d.id == id)
}

/// The ODF Fire Occurrence 2000-2022 definition.
///
/// # Panics
///
/// Panics if the embedded definition is missing from [`DATASET_TOMLS`].
#[must_use]
pub fn odf_fire_occurrence() -> DatasetDefinition {
    dataset("odf_fire_occurrence")
        .unwrap_or_else(|| panic!("odf_fire_occurrence.toml is not registered"))
}
