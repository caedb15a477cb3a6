#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Storm event record types at each stage of the pipeline.
//!
//! A [`RawRecord`] is what the loader hands over. Normalization resolves
//! damage magnitudes and the begin date into a [`NormalizedRecord`], and
//! classification attaches one [`EventCategory`] to produce a
//! [`ClassifiedRecord`].

use chrono::{Datelike as _, NaiveDate};
use serde::{Deserialize, Serialize};
use storm_impact_event_models::EventCategory;

/// A damage value split into a magnitude and a scale suffix, as recorded in
/// the source data (e.g. `2.5` with suffix `"K"` means $2,500).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageField {
    /// Non-negative magnitude.
    pub magnitude: f64,
    /// Scale suffix (`H`, `K`, `M`, `B`, empty, or anything else).
    pub suffix: String,
}

impl DamageField {
    /// Creates a damage field from a magnitude and suffix.
    #[must_use]
    pub fn new(magnitude: f64, suffix: &str) -> Self {
        Self {
            magnitude,
            suffix: suffix.to_owned(),
        }
    }
}

/// One observed weather event as supplied by the loader.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    /// Free-text event type label (e.g. `"TSTM WIND/HAIL"`).
    pub event_type: String,
    /// Region code (two-letter state abbreviation for valid records).
    pub region: String,
    /// Property damage.
    pub property_damage: DamageField,
    /// Crop damage.
    pub crop_damage: DamageField,
    /// Deaths attributed to the event.
    pub fatalities: u32,
    /// Injuries attributed to the event.
    pub injuries: u32,
    /// Begin date text as recorded (e.g. `"4/18/1950 0:00:00"`).
    pub begin_date: String,
}

/// A [`RawRecord`] with normalized text fields, resolved damage amounts and
/// a parsed begin date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRecord {
    /// Event type label, trimmed, whitespace-collapsed and uppercased.
    pub event_type: String,
    /// Region code, trimmed and uppercased.
    pub region: String,
    /// Property damage in US dollars.
    pub property_damage: f64,
    /// Crop damage in US dollars.
    pub crop_damage: f64,
    /// Deaths attributed to the event.
    pub fatalities: u32,
    /// Injuries attributed to the event.
    pub injuries: u32,
    /// Parsed begin date.
    pub begin_date: NaiveDate,
}

impl NormalizedRecord {
    /// Calendar year of the begin date.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.begin_date.year()
    }
}

/// A [`NormalizedRecord`] assigned to exactly one [`EventCategory`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedRecord {
    /// The normalized record.
    #[serde(flatten)]
    pub record: NormalizedRecord,
    /// Assigned category.
    pub category: EventCategory,
}

impl ClassifiedRecord {
    /// Calendar year of the begin date.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.record.year()
    }

    /// Region code.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.record.region
    }
}
