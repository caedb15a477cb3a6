#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation pipeline for classified storm records.
//!
//! [`filter`] restricts records to the analysis window and the valid region
//! set, [`aggregate`] melts them into long-form outcome rows and computes
//! grouped totals, scaled values and ranks, and [`report`] selects the top
//! regions per outcome. [`pipeline::Pipeline`] chains these together with
//! normalization and classification from `storm_impact_source`.

pub mod aggregate;
pub mod config;
pub mod filter;
pub mod pipeline;
pub mod report;

use storm_impact_source::SourceError;
use thiserror::Error;

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// No non-convection record exists to anchor the start of the analysis
    /// window.
    #[error("No non-convection records to anchor the analysis window")]
    EmptyDomain,

    /// Configuration values are invalid.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },

    /// TOML configuration parsing failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML configuration serialization failed.
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// I/O error (config file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Loading, normalization or classification failed.
    #[error(transparent)]
    Source(#[from] SourceError),
}
