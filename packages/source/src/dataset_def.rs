//! Config-driven fire dataset definition.
//!
//! [`DatasetDefinition`] captures everything unique about a published fire
//! occurrence dataset in a serializable config struct: column names, date
//! formats, load policies, size-class breakpoints and cause taxonomy. A single
//! generic loader handles every dataset.

use std::path::Path;

use fire_stats_fire_models::{CauseTaxonomy, SizeClassScheme};
use fire_stats_source_models::{MissingAcresPolicy, RowPolicy};
use serde::Deserialize;

use crate::LoadError;
use crate::parsing::DEFAULT_DATE_FORMATS;

// ── Top-level dataset definition ─────────────────────────────────────────

/// A complete, config-driven fire dataset definition.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetDefinition {
    /// Unique identifier (e.g., `"odf_fire_occurrence"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Data portal page for the dataset.
    #[serde(default)]
    pub portal_url: Option<String>,
    /// Licensing and attribution metadata.
    pub license: LicenseInfo,
    /// Compression format: `"gzip"` or omit. Files ending in `.gz` are
    /// decompressed regardless.
    #[serde(default)]
    pub compressed: Option<String>,
    /// Field delimiter (default: comma).
    #[serde(default)]
    pub delimiter: Option<String>,
    /// Column name mappings.
    pub fields: FieldMapping,
    /// `chrono` formats tried in order for every date column.
    #[serde(default = "default_date_formats")]
    pub date_formats: Vec<String>,
    /// What to do with malformed rows.
    #[serde(default)]
    pub row_policy: RowPolicy,
    /// What to do with blank acreage.
    #[serde(default)]
    pub missing_acres: MissingAcresPolicy,
    /// Size-class breakpoints. Defaults to the NWCG A-G scheme.
    #[serde(default)]
    pub size_classes: SizeClassScheme,
    /// Cause taxonomy. Defaults to Human / Lightning / Under Investigation.
    #[serde(default)]
    pub causes: CauseTaxonomy,
}

fn default_date_formats() -> Vec<String> {
    DEFAULT_DATE_FORMATS.iter().map(|f| (*f).to_string()).collect()
}

// ── License metadata ─────────────────────────────────────────────────────

/// Licensing and attribution for a dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct LicenseInfo {
    /// License type identifier (e.g. `"public_domain"`, `"open_data"`).
    pub license_type: String,
    /// URL to the terms of use, if available.
    #[serde(default)]
    pub tos_url: Option<String>,
    /// Whether attribution is required when publishing derived charts.
    pub attribution_required: bool,
    /// Verbatim attribution text.
    #[serde(default)]
    pub attribution_text: Option<String>,
}

// ── Field mapping ────────────────────────────────────────────────────────

/// Maps dataset column headers to [`fire_stats_fire_models::FireRecord`]
/// fields. `Option` columns may be left out of the definition; a column that
/// is named here must exist in the file header.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldMapping {
    /// Unique identifier column.
    pub id: String,
    /// Reporting year column.
    pub fire_year: String,
    /// Incident name column.
    #[serde(default)]
    pub fire_name: Option<String>,
    /// Administrative area column.
    pub area: String,
    /// Protection district column.
    #[serde(default)]
    pub district: Option<String>,
    /// Protection unit column.
    #[serde(default)]
    pub unit: Option<String>,
    /// County column.
    #[serde(default)]
    pub county: Option<String>,
    /// Latitude column (decimal degrees).
    #[serde(default)]
    pub latitude: Option<String>,
    /// Longitude column (decimal degrees).
    #[serde(default)]
    pub longitude: Option<String>,
    /// Raw cause column, mapped through the cause taxonomy.
    pub cause: String,
    /// General cause detail column.
    #[serde(default)]
    pub general_cause: Option<String>,
    /// Specific cause detail column.
    #[serde(default)]
    pub specific_cause: Option<String>,
    /// Acreage column.
    pub size_acres: String,
    /// The dataset's own size-class column. Only used to pick donor rows for
    /// [`MissingAcresPolicy::ImputeClassMean`]; record classes are always
    /// derived from acreage.
    #[serde(default)]
    pub source_size_class: Option<String>,
    /// Ignition datetime column.
    #[serde(default)]
    pub ignited_at: Option<String>,
    /// Report datetime column.
    #[serde(default)]
    pub reported_at: Option<String>,
    /// Discovery datetime column.
    #[serde(default)]
    pub discovered_at: Option<String>,
    /// Control datetime column.
    #[serde(default)]
    pub controlled_at: Option<String>,
}

impl FieldMapping {
    /// Every configured column name, required ones first.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        let required = [
            self.id.as_str(),
            self.fire_year.as_str(),
            self.area.as_str(),
            self.cause.as_str(),
            self.size_acres.as_str(),
        ];
        let optional = [
            &self.fire_name,
            &self.district,
            &self.unit,
            &self.county,
            &self.latitude,
            &self.longitude,
            &self.general_cause,
            &self.specific_cause,
            &self.source_size_class,
            &self.ignited_at,
            &self.reported_at,
            &self.discovered_at,
            &self.controlled_at,
        ];
        required
            .into_iter()
            .chain(optional.into_iter().filter_map(|c| c.as_deref()))
            .collect()
    }
}

impl DatasetDefinition {
    /// Returns the unique dataset identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable dataset name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the licensing metadata for this dataset.
    #[must_use]
    pub const fn license(&self) -> &LicenseInfo {
        &self.license
    }

    /// Returns the field delimiter byte.
    #[must_use]
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter
            .as_deref()
            .and_then(|d| d.as_bytes().first().copied())
            .unwrap_or(b',')
    }

    /// Overrides the malformed-row policy.
    #[must_use]
    pub const fn with_row_policy(mut self, policy: RowPolicy) -> Self {
        self.row_policy = policy;
        self
    }

    /// Overrides the blank-acreage policy.
    #[must_use]
    pub const fn with_missing_acres(mut self, policy: MissingAcresPolicy) -> Self {
        self.missing_acres = policy;
        self
    }

    /// Overrides the size-class scheme.
    #[must_use]
    pub fn with_size_classes(mut self, scheme: SizeClassScheme) -> Self {
        self.size_classes = scheme;
        self
    }

    /// Overrides the cause taxonomy.
    #[must_use]
    pub fn with_causes(mut self, taxonomy: CauseTaxonomy) -> Self {
        self.causes = taxonomy;
        self
    }
}

/// Parses a [`DatasetDefinition`] from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is malformed, missing required fields, or
/// carries an invalid size-class scheme.
pub fn parse_dataset_toml(toml_str: &str) -> Result<DatasetDefinition, toml::de::Error> {
    toml::de::from_str(toml_str)
}

/// Reads a [`DatasetDefinition`] from a TOML file, for datasets that are not
/// embedded in the registry.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be read and
/// [`LoadError::Definition`] if its contents are not a valid definition.
pub fn read_dataset_toml(path: &Path) -> Result<DatasetDefinition, LoadError> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_dataset_toml(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        id = "mini"
        name = "Minimal"

        [license]
        license_type = "public_domain"
        attribution_required = false

        [fields]
        id = "ID"
        fire_year = "YEAR"
        area = "AREA"
        cause = "CAUSE"
        size_acres = "ACRES"
    "#;

    #[test]
    fn minimal_definition_uses_defaults() {
        let def = parse_dataset_toml(MINIMAL).unwrap();
        assert_eq!(def.id(), "mini");
        assert_eq!(def.row_policy, RowPolicy::Strict);
        assert_eq!(def.missing_acres, MissingAcresPolicy::Reject);
        assert_eq!(def.size_classes, SizeClassScheme::default());
        assert_eq!(def.causes, CauseTaxonomy::default());
        assert_eq!(def.date_formats.len(), DEFAULT_DATE_FORMATS.len());
        assert_eq!(def.delimiter_byte(), b',');
        assert_eq!(def.fields.columns(), ["ID", "YEAR", "AREA", "CAUSE", "ACRES"]);
    }

    #[test]
    fn policies_and_overrides() {
        let toml_str = format!("row_policy = \"skip\"\ndelimiter = \"\\t\"\n{MINIMAL}");
        let def = parse_dataset_toml(&toml_str).unwrap();
        assert_eq!(def.row_policy, RowPolicy::Skip);
        assert_eq!(def.delimiter_byte(), b'\t');

        let def = def
            .with_row_policy(RowPolicy::Strict)
            .with_missing_acres(MissingAcresPolicy::ImputeClassMean);
        assert_eq!(def.row_policy, RowPolicy::Strict);
        assert_eq!(def.missing_acres, MissingAcresPolicy::ImputeClassMean);
    }

    #[test]
    fn metadata_accessors() {
        let toml_str = MINIMAL.replace(
            "attribution_required = false",
            "attribution_required = true\nattribution_text = \"Oregon Department of Forestry\"",
        );
        let def = parse_dataset_toml(&toml_str).unwrap();
        assert_eq!(def.name(), "Minimal");
        assert_eq!(def.license().license_type, "public_domain");
        assert!(def.license().attribution_required);
        assert_eq!(
            def.license().attribution_text.as_deref(),
            Some("Oregon Department of Forestry")
        );
        assert!(def.license().tos_url.is_none());
    }

    #[test]
    fn scheme_and_taxonomy_overrides() {
        let bound = |label: &str, min_acres: f64| fire_stats_fire_models::SizeClassBound {
            label: label.to_string(),
            min_acres,
            exclusive_min: false,
        };
        let scheme = SizeClassScheme::try_from(vec![bound("Small", 0.0), bound("Large", 100.0)])
            .unwrap();
        let taxonomy = CauseTaxonomy {
            fallback: "Other".to_string(),
            ..CauseTaxonomy::default()
        };

        let def = parse_dataset_toml(MINIMAL)
            .unwrap()
            .with_size_classes(scheme.clone())
            .with_causes(taxonomy.clone());
        assert_eq!(def.size_classes, scheme);
        assert_eq!(def.causes, taxonomy);
        assert_eq!(def.size_classes.classify(250.0).unwrap().label, "Large");
        assert_eq!(def.causes.labels().last(), Some(&"Other"));
    }

    #[test]
    fn rejects_invalid_size_classes() {
        let toml_str = format!(
            "{MINIMAL}\n[[size_classes]]\nlabel = \"A\"\nmin_acres = 1.0\n"
        );
        assert!(parse_dataset_toml(&toml_str).is_err());
    }

    #[test]
    fn reads_definition_files() {
        let dir = std::env::temp_dir().join(format!("fire_stats_def_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let good = dir.join("mini.toml");
        std::fs::write(&good, MINIMAL).unwrap();
        assert_eq!(read_dataset_toml(&good).unwrap().id(), "mini");

        let bad = dir.join("bad.toml");
        std::fs::write(&bad, "id = ").unwrap();
        assert!(matches!(
            read_dataset_toml(&bad),
            Err(LoadError::Definition(_))
        ));

        assert!(matches!(
            read_dataset_toml(&dir.join("absent.toml")),
            Err(LoadError::Io(_))
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn rejects_missing_required_field() {
        let toml_str = MINIMAL.replace("size_acres = \"ACRES\"", "");
        assert!(parse_dataset_toml(&toml_str).is_err());
    }
}
