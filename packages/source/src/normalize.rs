//! Field normalization.
//!
//! Turns [`RawRecord`]s into [`NormalizedRecord`]s: text fields are cleaned
//! up, damage magnitude codes are resolved into absolute amounts, and the
//! begin date is parsed. Records with an unparseable begin date are dropped
//! and counted; nothing else about a record can fail.

use std::sync::Arc;

use rayon::prelude::*;
use storm_impact_source_models::{NormalizedRecord, RawRecord};

use crate::SourceError;
use crate::parsing::{normalize_label, parse_begin_date, resolve_damage};
use crate::progress::ProgressCallback;

/// Default `chrono` format for begin dates (month/day/year).
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";

/// Result of normalizing a batch of records.
#[derive(Debug, Clone, Default)]
pub struct NormalizeOutput {
    /// Successfully normalized records, in input order.
    pub records: Vec<NormalizedRecord>,
    /// Number of records dropped because the begin date could not be parsed.
    pub malformed_dates: usize,
}

/// Normalizes a single record.
///
/// # Errors
///
/// Returns [`SourceError::MalformedDate`] if the begin date does not match
/// `date_format`.
pub fn normalize_record(
    raw: &RawRecord,
    date_format: &str,
) -> Result<NormalizedRecord, SourceError> {
    let begin_date = parse_begin_date(&raw.begin_date, date_format).ok_or_else(|| {
        SourceError::MalformedDate {
            raw: raw.begin_date.clone(),
            format: date_format.to_owned(),
        }
    })?;

    Ok(NormalizedRecord {
        event_type: normalize_label(&raw.event_type),
        region: raw.region.trim().to_uppercase(),
        property_damage: resolve_damage(&raw.property_damage),
        crop_damage: resolve_damage(&raw.crop_damage),
        fatalities: raw.fatalities,
        injuries: raw.injuries,
        begin_date,
    })
}

/// Normalizes every record in parallel, dropping and counting those with
/// malformed begin dates.
#[must_use]
pub fn normalize_all(
    raws: &[RawRecord],
    date_format: &str,
    progress: &Arc<dyn ProgressCallback>,
) -> NormalizeOutput {
    progress.set_total(raws.len() as u64);

    let results: Vec<Result<NormalizedRecord, SourceError>> = raws
        .par_iter()
        .map(|raw| {
            let result = normalize_record(raw, date_format);
            progress.inc(1);
            result
        })
        .collect();

    let mut output = NormalizeOutput {
        records: Vec::with_capacity(results.len()),
        malformed_dates: 0,
    };

    for result in results {
        match result {
            Ok(record) => output.records.push(record),
            Err(e) => {
                log::debug!("Dropping record: {e}");
                output.malformed_dates += 1;
            }
        }
    }

    if output.malformed_dates > 0 {
        log::warn!(
            "Dropped {} of {} records with malformed begin dates",
            output.malformed_dates,
            raws.len()
        );
    }
    progress.finish(format!("Normalized {} records", output.records.len()));

    output
}
