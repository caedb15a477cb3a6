#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Storm record loading, normalization and classification.
//!
//! Records flow from [`csv_load`] through [`normalize`] (date parsing and
//! damage resolution) into [`type_mapping`], which assigns each one a
//! category from the canonical taxonomy. Every per-record step is a pure
//! function; batch helpers run them in parallel with `rayon`.

pub mod csv_load;
pub mod normalize;
pub mod parsing;
pub mod progress;
pub mod type_mapping;

use storm_impact_event_models::EventCategory;

/// Errors that can occur while loading, normalizing or classifying records.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required CSV column is absent from the header row.
    #[error("Missing required column '{column}'")]
    MissingColumn {
        /// Name of the missing column.
        column: String,
    },

    /// The begin date could not be parsed.
    #[error("Malformed begin date '{raw}' (expected format '{format}')")]
    MalformedDate {
        /// The date text as recorded.
        raw: String,
        /// The `chrono` format that was tried.
        format: String,
    },

    /// A taxonomy pattern is not a valid regular expression.
    #[error("Invalid pattern '{pattern}' for {category}: {source}")]
    InvalidPattern {
        /// Category the pattern belongs to.
        category: EventCategory,
        /// The offending pattern.
        pattern: String,
        /// Underlying regex error.
        source: regex::Error,
    },

    /// The taxonomy rules are structurally invalid.
    #[error("Invalid taxonomy: {message}")]
    InvalidTaxonomy {
        /// Description of what went wrong.
        message: String,
    },
}
