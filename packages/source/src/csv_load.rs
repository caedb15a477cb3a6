//! Storm data CSV loader.
//!
//! Reads the NOAA storm database export (optionally gzip-compressed) and
//! maps the columns the pipeline needs onto [`RawRecord`]s. Every other
//! column is ignored. Rows that cannot be deserialized are skipped with a
//! warning rather than failing the whole load.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use storm_impact_source_models::{DamageField, RawRecord};

use crate::SourceError;
use crate::progress::ProgressCallback;

/// Columns without which a row cannot be placed in time, space or category.
const REQUIRED_COLUMNS: [&str; 3] = ["STATE", "BGN_DATE", "EVTYPE"];

/// Outcome columns. A missing one reads as zero for every row.
const OUTCOME_COLUMNS: [&str; 4] = ["FATALITIES", "INJURIES", "PROPDMG", "PROPDMGEXP"];

/// The subset of storm database columns used by the pipeline.
#[derive(Debug, Deserialize)]
struct StormDataRow {
    #[serde(rename = "STATE")]
    state: String,
    #[serde(rename = "BGN_DATE")]
    begin_date: String,
    #[serde(rename = "EVTYPE")]
    event_type: String,
    #[serde(rename = "FATALITIES")]
    fatalities: Option<f64>,
    #[serde(rename = "INJURIES")]
    injuries: Option<f64>,
    #[serde(rename = "PROPDMG")]
    property_damage: Option<f64>,
    #[serde(rename = "PROPDMGEXP", default)]
    property_damage_exp: String,
    #[serde(rename = "CROPDMG")]
    crop_damage: Option<f64>,
    #[serde(rename = "CROPDMGEXP", default)]
    crop_damage_exp: String,
}

impl From<StormDataRow> for RawRecord {
    fn from(row: StormDataRow) -> Self {
        Self {
            event_type: row.event_type,
            region: row.state,
            property_damage: DamageField {
                magnitude: to_magnitude(row.property_damage),
                suffix: row.property_damage_exp,
            },
            crop_damage: DamageField {
                magnitude: to_magnitude(row.crop_damage),
                suffix: row.crop_damage_exp,
            },
            fatalities: to_count(row.fatalities),
            injuries: to_count(row.injuries),
            begin_date: row.begin_date,
        }
    }
}

/// Records read from a CSV source.
#[derive(Debug, Clone, Default)]
pub struct LoadOutput {
    /// Parsed records, in file order.
    pub records: Vec<RawRecord>,
    /// Rows skipped because they could not be deserialized.
    pub skipped_rows: usize,
}

/// Loads storm records from a CSV file. Files ending in `.gz` are
/// decompressed on the fly.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be opened or the CSV header
/// row cannot be read.
pub fn load_csv(
    path: &Path,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<LoadOutput, SourceError> {
    log::info!("Loading storm records from {}", path.display());

    let file = BufReader::new(File::open(path)?);
    let is_gzipped = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));

    if is_gzipped {
        read_records(flate2::read::MultiGzDecoder::new(file), progress)
    } else {
        read_records(file, progress)
    }
}

/// Reads storm records from any CSV byte stream with a header row.
///
/// # Errors
///
/// Returns [`SourceError::Csv`] if the header row is missing or lacks a
/// required column.
pub fn read_records<R: Read>(
    reader: R,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<LoadOutput, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if let Some(column) = missing_columns(&headers, &REQUIRED_COLUMNS).first() {
        return Err(SourceError::MissingColumn {
            column: (*column).to_owned(),
        });
    }
    let missing_outcomes = missing_columns(&headers, &OUTCOME_COLUMNS);
    if !missing_outcomes.is_empty() {
        log::warn!(
            "CSV has no {} column(s); those outcomes will be zero for every record",
            missing_outcomes.join(", ")
        );
    }

    let mut output = LoadOutput::default();

    for (idx, result) in reader.deserialize::<StormDataRow>().enumerate() {
        match result {
            Ok(row) => output.records.push(row.into()),
            Err(e) => {
                log::warn!("Skipping CSV row {}: {e}", idx + 2);
                output.skipped_rows += 1;
            }
        }
        progress.inc(1);
    }

    log::info!(
        "Loaded {} records ({} rows skipped)",
        output.records.len(),
        output.skipped_rows
    );
    progress.finish(format!("Loaded {} records", output.records.len()));

    Ok(output)
}

/// Returns the entries of `columns` absent from `headers`, in order.
fn missing_columns<'a>(headers: &csv::StringRecord, columns: &[&'a str]) -> Vec<&'a str> {
    columns
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect()
}

/// Converts a numeric casualty column into a non-negative count.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_count(value: Option<f64>) -> u32 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v.min(f64::from(u32::MAX)) as u32,
        _ => 0,
    }
}

/// Converts a numeric damage column into a non-negative magnitude.
fn to_magnitude(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}
