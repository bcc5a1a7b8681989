//! CSV file loader.
//!
//! Reads a dataset export (optionally gzip-compressed), resolves the
//! configured columns against the header row, and turns every data row into a
//! [`FireRecord`] or a [`RowRejection`]. Loading happens in two passes: the
//! first decodes and parses each row on its own, the second enforces
//! identifier uniqueness, imputes blank acreage (when enabled) and derives
//! size classes, in file order.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{Datelike as _, NaiveDateTime};
use csv::StringRecord;
use fire_stats_fire_models::{FireRecord, Location, SizeClass};
use fire_stats_source_models::{
    LoadReport, MissingAcresPolicy, RowIssue, RowPolicy, RowRejection,
};

use crate::LoadError;
use crate::cause_mapping::map_cause;
use crate::dataset_def::{DatasetDefinition, FieldMapping};
use crate::parsing::{
    non_blank, parse_acres, parse_coordinates, parse_optional_datetime, parse_year,
};

/// The records produced by a load and the report describing it.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    /// Records in file order.
    pub records: Vec<FireRecord>,
    /// Counts and rejected rows.
    pub report: LoadReport,
}

// ── Column resolution ────────────────────────────────────────────────────

/// Header positions of every configured column.
struct Columns {
    id: usize,
    fire_year: usize,
    area: usize,
    cause: usize,
    size_acres: usize,
    fire_name: Option<usize>,
    district: Option<usize>,
    unit: Option<usize>,
    county: Option<usize>,
    latitude: Option<usize>,
    longitude: Option<usize>,
    general_cause: Option<usize>,
    specific_cause: Option<usize>,
    source_size_class: Option<usize>,
    ignited_at: Option<usize>,
    reported_at: Option<usize>,
    discovered_at: Option<usize>,
    controlled_at: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord, fields: &FieldMapping) -> Result<Self, LoadError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| LoadError::MissingColumn {
                    column: name.to_string(),
                })
        };
        let find_opt = |name: &Option<String>| name.as_deref().map(&find).transpose();

        Ok(Self {
            id: find(&fields.id)?,
            fire_year: find(&fields.fire_year)?,
            area: find(&fields.area)?,
            cause: find(&fields.cause)?,
            size_acres: find(&fields.size_acres)?,
            fire_name: find_opt(&fields.fire_name)?,
            district: find_opt(&fields.district)?,
            unit: find_opt(&fields.unit)?,
            county: find_opt(&fields.county)?,
            latitude: find_opt(&fields.latitude)?,
            longitude: find_opt(&fields.longitude)?,
            general_cause: find_opt(&fields.general_cause)?,
            specific_cause: find_opt(&fields.specific_cause)?,
            source_size_class: find_opt(&fields.source_size_class)?,
            ignited_at: find_opt(&fields.ignited_at)?,
            reported_at: find_opt(&fields.reported_at)?,
            discovered_at: find_opt(&fields.discovered_at)?,
            controlled_at: find_opt(&fields.controlled_at)?,
        })
    }
}

// ── Row parsing ──────────────────────────────────────────────────────────

/// A row that parsed on its own but still needs acreage, a size class and a
/// uniqueness check.
struct PendingRecord {
    id: String,
    fire_year: i32,
    fire_name: Option<String>,
    location: Location,
    cause: String,
    general_cause: Option<String>,
    specific_cause: Option<String>,
    size_acres: Option<f64>,
    source_size_class: Option<String>,
    ignited_at: Option<NaiveDateTime>,
    reported_at: Option<NaiveDateTime>,
    discovered_at: Option<NaiveDateTime>,
    controlled_at: Option<NaiveDateTime>,
}

impl PendingRecord {
    fn into_record(self, size_acres: f64, acres_imputed: bool, size_class: SizeClass) -> FireRecord {
        FireRecord {
            id: self.id,
            fire_year: self.fire_year,
            fire_name: self.fire_name,
            location: self.location,
            cause: self.cause,
            general_cause: self.general_cause,
            specific_cause: self.specific_cause,
            size_acres,
            acres_imputed,
            size_class,
            ignited_at: self.ignited_at,
            reported_at: self.reported_at,
            discovered_at: self.discovered_at,
            controlled_at: self.controlled_at,
        }
    }
}

/// A row that could not become a record.
struct Rejected {
    id: Option<String>,
    issue: RowIssue,
}

fn cell(row: &StringRecord, idx: usize) -> &str {
    row.get(idx).unwrap_or("")
}

fn optional(row: &StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| non_blank(cell(row, i)))
        .map(str::to_string)
}

fn required<'r>(row: &'r StringRecord, idx: usize, column: &str) -> Result<&'r str, RowIssue> {
    non_blank(cell(row, idx)).ok_or_else(|| RowIssue::MissingField {
        column: column.to_string(),
    })
}

fn optional_date(
    def: &DatasetDefinition,
    row: &StringRecord,
    idx: Option<usize>,
    column: Option<&String>,
) -> Result<Option<NaiveDateTime>, RowIssue> {
    match (idx, column) {
        (Some(i), Some(name)) => parse_optional_datetime(name, cell(row, i), &def.date_formats),
        _ => Ok(None),
    }
}

fn parse_row(
    def: &DatasetDefinition,
    cols: &Columns,
    row: &StringRecord,
    width: usize,
) -> Result<PendingRecord, Rejected> {
    let id = non_blank(cell(row, cols.id)).map(str::to_string);
    parse_fields(def, cols, row, width).map_err(|issue| Rejected { id, issue })
}

fn parse_fields(
    def: &DatasetDefinition,
    cols: &Columns,
    row: &StringRecord,
    width: usize,
) -> Result<PendingRecord, RowIssue> {
    let fields = &def.fields;

    if row.len() != width {
        return Err(RowIssue::WrongFieldCount {
            expected: width,
            found: row.len(),
        });
    }

    // ── Required ─────────────────────────────────────────────
    let id = required(row, cols.id, &fields.id)?.to_string();
    let fire_year = parse_year(
        &fields.fire_year,
        required(row, cols.fire_year, &fields.fire_year)?,
    )?;
    let area = required(row, cols.area, &fields.area)?.to_string();
    let raw_cause = required(row, cols.cause, &fields.cause)?;
    let cause = map_cause(&def.causes, raw_cause).to_string();

    let size_acres = match non_blank(cell(row, cols.size_acres)) {
        Some(value) => Some(parse_acres(&fields.size_acres, value)?),
        None if def.missing_acres == MissingAcresPolicy::ImputeClassMean => None,
        None => {
            return Err(RowIssue::MissingField {
                column: fields.size_acres.clone(),
            });
        }
    };

    // ── Dates ────────────────────────────────────────────────
    let ignited_at = optional_date(def, row, cols.ignited_at, fields.ignited_at.as_ref())?;
    let reported_at = optional_date(def, row, cols.reported_at, fields.reported_at.as_ref())?;
    let discovered_at =
        optional_date(def, row, cols.discovered_at, fields.discovered_at.as_ref())?;
    let controlled_at =
        optional_date(def, row, cols.controlled_at, fields.controlled_at.as_ref())?;

    if let Some(anchor) = ignited_at.or(discovered_at)
        && anchor.year() != fire_year
    {
        return Err(RowIssue::YearMismatch {
            fire_year,
            date_year: anchor.year(),
        });
    }

    // ── Location ─────────────────────────────────────────────
    let coordinates = match (
        cols.latitude.zip(fields.latitude.as_deref()),
        cols.longitude.zip(fields.longitude.as_deref()),
    ) {
        (Some((lat_idx, lat_col)), Some((lng_idx, lng_col))) => {
            parse_coordinates(lat_col, cell(row, lat_idx), lng_col, cell(row, lng_idx))?
        }
        _ => None,
    };

    Ok(PendingRecord {
        id,
        fire_year,
        fire_name: optional(row, cols.fire_name),
        location: Location {
            area,
            district: optional(row, cols.district),
            unit: optional(row, cols.unit),
            county: optional(row, cols.county),
            coordinates,
        },
        cause,
        general_cause: optional(row, cols.general_cause),
        specific_cause: optional(row, cols.specific_cause),
        size_acres,
        source_size_class: optional(row, cols.source_size_class),
        ignited_at,
        reported_at,
        discovered_at,
        controlled_at,
    })
}

/// Rejects a row holding bytes that are not UTF-8. The identifier is kept
/// when its own field decodes.
fn undecodable(headers: &StringRecord, id_idx: usize, err: csv::FromUtf8Error) -> Rejected {
    let column = headers
        .get(err.utf8_error().field())
        .unwrap_or_default()
        .to_string();
    let id = err
        .into_byte_record()
        .get(id_idx)
        .and_then(|raw| std::str::from_utf8(raw).ok())
        .and_then(non_blank)
        .map(str::to_string);
    Rejected {
        id,
        issue: RowIssue::InvalidEncoding { column },
    }
}

// ── Second pass ──────────────────────────────────────────────────────────

/// Mean acreage per source size class, over rows whose acreage was present.
/// Repeated identifiers are skipped the same way the second pass rejects
/// them, so a duplicate row never feeds the mean.
fn donor_means(parsed: &[(u64, Result<PendingRecord, Rejected>)]) -> BTreeMap<String, f64> {
    let mut seen_ids = BTreeSet::new();
    let mut sums: BTreeMap<&str, (f64, u32)> = BTreeMap::new();
    for pending in parsed.iter().filter_map(|(_, r)| r.as_ref().ok()) {
        if !seen_ids.insert(pending.id.as_str()) {
            continue;
        }
        if let (Some(acres), Some(class)) = (pending.size_acres, pending.source_size_class.as_deref())
        {
            let entry = sums.entry(class).or_insert((0.0, 0));
            entry.0 += acres;
            entry.1 += 1;
        }
    }
    sums.into_iter()
        .map(|(class, (sum, n))| (class.to_string(), sum / f64::from(n)))
        .collect()
}

fn finish(
    def: &DatasetDefinition,
    pending: PendingRecord,
    donor_means: &BTreeMap<String, f64>,
    seen_ids: &mut BTreeSet<String>,
) -> Result<FireRecord, Rejected> {
    let reject = |id: &str, issue: RowIssue| Rejected {
        id: Some(id.to_string()),
        issue,
    };

    if !seen_ids.insert(pending.id.clone()) {
        return Err(reject(
            &pending.id,
            RowIssue::DuplicateId {
                id: pending.id.clone(),
            },
        ));
    }

    let (acres, imputed) = match pending.size_acres {
        Some(acres) => (acres, false),
        None => {
            let class = pending.source_size_class.clone().unwrap_or_default();
            let Some(mean) = donor_means.get(&class).copied() else {
                return Err(reject(
                    &pending.id,
                    RowIssue::NoImputationDonors { size_class: class },
                ));
            };
            (mean, true)
        }
    };

    let Some(size_class) = def.size_classes.classify(acres) else {
        return Err(reject(&pending.id, RowIssue::InvalidAcres { value: acres }));
    };

    Ok(pending.into_record(acres, imputed, size_class))
}

fn handle_rejection(
    def: &DatasetDefinition,
    report: &mut LoadReport,
    line: u64,
    rejected: Rejected,
) -> Result<(), LoadError> {
    match def.row_policy {
        RowPolicy::Strict => Err(LoadError::MalformedRow {
            line,
            issue: rejected.issue,
        }),
        RowPolicy::Skip => {
            log::warn!(
                "[{}] Skipping line {line} ({}): {}",
                def.id,
                rejected.id.as_deref().unwrap_or("no id"),
                rejected.issue
            );
            report.rejections.push(RowRejection {
                line,
                id: rejected.id,
                issue: rejected.issue,
            });
            Ok(())
        }
    }
}

// ── Entry points ─────────────────────────────────────────────────────────

impl DatasetDefinition {
    /// Loads a dataset export from disk. Files ending in `.gz`, or any file
    /// when the definition sets `compressed = "gzip"`, are decompressed first.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the file cannot be read, a configured column
    /// is missing from the header, the file has no data rows, or (under
    /// [`RowPolicy::Strict`]) any row is malformed.
    pub fn load(&self, path: &Path) -> Result<LoadedDataset, LoadError> {
        log::info!("[{}] Loading {}", self.id, path.display());

        let file = BufReader::new(File::open(path)?);
        let gzipped = self.compressed.as_deref() == Some("gzip")
            || path.extension().is_some_and(|ext| ext == "gz");

        if gzipped {
            self.load_reader(flate2::read::GzDecoder::new(file))
        } else {
            self.load_reader(file)
        }
    }

    /// Loads a dataset export from any reader of CSV text.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<LoadedDataset, LoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter_byte())
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        if headers.is_empty() {
            return Err(LoadError::EmptySource);
        }
        let cols = Columns::resolve(&headers, &self.fields)?;

        let mut report = LoadReport::default();
        let mut parsed = Vec::new();

        for result in csv_reader.byte_records() {
            let raw = result?;
            report.rows_read += 1;
            let line = raw
                .position()
                .map_or(report.rows_read + 1, csv::Position::line);
            let pending = match StringRecord::from_byte_record(raw) {
                Ok(row) => parse_row(self, &cols, &row, headers.len()),
                Err(err) => Err(undecodable(&headers, cols.id, err)),
            };
            parsed.push((line, pending));
        }

        if report.rows_read == 0 {
            return Err(LoadError::EmptySource);
        }

        let donor_means = if self.missing_acres == MissingAcresPolicy::ImputeClassMean {
            donor_means(&parsed)
        } else {
            BTreeMap::new()
        };

        let mut seen_ids = BTreeSet::new();
        let mut records = Vec::with_capacity(parsed.len());

        for (line, result) in parsed {
            match result.and_then(|pending| finish(self, pending, &donor_means, &mut seen_ids)) {
                Ok(record) => {
                    if record.acres_imputed {
                        report.imputed += 1;
                    }
                    records.push(record);
                }
                Err(rejected) => handle_rejection(self, &mut report, line, rejected)?,
            }
        }

        report.loaded = records.len() as u64;

        log::info!(
            "[{}] Loaded {} of {} rows ({} rejected, {} imputed)",
            self.id,
            report.loaded,
            report.rows_read,
            report.rejected(),
            report.imputed
        );

        Ok(LoadedDataset { records, report })
    }
}
