//! Shared parsing utilities for storm records.
//!
//! Date parsing and damage magnitude resolution used by the normalizer.

use chrono::NaiveDate;
use storm_impact_source_models::DamageField;

/// Returns the multiplier for a damage scale suffix.
///
/// `H`, `K`, `M` and `B` (any case) map to hundreds, thousands, millions and
/// billions. Anything else, including an empty suffix and the stray `+`,
/// `?` and digit codes found in the source data, maps to 1.
#[must_use]
pub fn scale_multiplier(suffix: &str) -> f64 {
    match suffix.trim().to_ascii_uppercase().as_str() {
        "H" => 1e2,
        "K" => 1e3,
        "M" => 1e6,
        "B" => 1e9,
        _ => 1.0,
    }
}

/// Resolves a magnitude/suffix pair into an absolute amount.
#[must_use]
pub fn resolve_damage(field: &DamageField) -> f64 {
    field.magnitude * scale_multiplier(&field.suffix)
}

/// Parses a begin date using the given `chrono` format string.
///
/// The whole trimmed value is tried first. If that fails, only the leading
/// whitespace-delimited token is parsed so that a trailing time of day
/// (`"4/18/1950 0:00:00"`) doesn't need to be described by `format`.
#[must_use]
pub fn parse_begin_date(raw: &str, format: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
        return Some(date);
    }
    let token = trimmed.split_whitespace().next()?;
    NaiveDate::parse_from_str(token, format).ok()
}

/// Trims, collapses internal whitespace and uppercases free text.
#[must_use]
pub fn normalize_label(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}
