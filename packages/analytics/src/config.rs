//! Pipeline configuration.
//!
//! Every option has a default, so an empty TOML document is a valid
//! configuration. Example:
//!
//! ```toml
//! valid_regions = ["IL", "IN", "IA"]
//! top_k = 5
//! date_format = "%m/%d/%Y"
//!
//! [[taxonomy]]
//! category = "CONVECTION"
//! patterns = ["torn", "tstm|thunderstorm", "hail"]
//!
//! [[taxonomy]]
//! category = "FLOOD"
//! patterns = ["flood", "rain"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use storm_impact_geography_models::RegionSet;
use storm_impact_source::normalize::DEFAULT_DATE_FORMAT;
use storm_impact_source::type_mapping::{Taxonomy, TaxonomyRule, default_rules};

use crate::AnalyticsError;

/// Default number of top-ranked regions per outcome in the report.
pub const DEFAULT_TOP_K: usize = 3;

/// Options recognized by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Region codes kept for analysis. Defaults to the 50 US states.
    pub valid_regions: RegionSet,
    /// Top-ranked regions per outcome included in the report.
    pub top_k: usize,
    /// `chrono` format for the leading date token of the begin date.
    pub date_format: String,
    /// Classification rules in priority order.
    pub taxonomy: Vec<TaxonomyRule>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            valid_regions: RegionSet::default(),
            top_k: DEFAULT_TOP_K,
            date_format: DEFAULT_DATE_FORMAT.to_owned(),
            taxonomy: default_rules(),
        }
    }
}

impl PipelineConfig {
    /// Parses and validates a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Toml`] if the document is malformed, or any
    /// error from [`Self::validate`].
    pub fn from_toml_str(contents: &str) -> Result<Self, AnalyticsError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Io`] if the file cannot be read, or any
    /// error from [`Self::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, AnalyticsError> {
        log::info!("Loading pipeline config from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Serializes this configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::TomlSerialize`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, AnalyticsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks that the configuration can drive a pipeline run.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Config`] if `top_k` is zero, the region set
    /// is empty or the date format is blank, and [`AnalyticsError::Source`]
    /// if the taxonomy does not compile.
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if self.top_k == 0 {
            return Err(AnalyticsError::Config {
                message: "top_k must be at least 1".to_owned(),
            });
        }
        if self.valid_regions.is_empty() {
            return Err(AnalyticsError::Config {
                message: "valid_regions must not be empty".to_owned(),
            });
        }
        if self.date_format.trim().is_empty() {
            return Err(AnalyticsError::Config {
                message: "date_format must not be empty".to_owned(),
            });
        }
        self.compile_taxonomy()?;
        Ok(())
    }

    /// Compiles the configured taxonomy rules.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Source`] if a pattern is invalid or the
    /// rules are structurally invalid.
    pub fn compile_taxonomy(&self) -> Result<Taxonomy, AnalyticsError> {
        Ok(Taxonomy::compile(&self.taxonomy)?)
    }
}

#[cfg(test)]
mod tests {
    use storm_impact_event_models::EventCategory;

    use super::*;

    #[test]
    fn empty_document_is_default() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.top_k, 3);
        assert_eq!(config.valid_regions.len(), 50);
        assert_eq!(config.date_format, "%m/%d/%Y");
        assert_eq!(config.taxonomy.len(), 4);
    }

    #[test]
    fn parses_overrides() {
        let config = PipelineConfig::from_toml_str(
            r#"
valid_regions = ["il", "TX"]
top_k = 5
date_format = "%Y-%m-%d"

[[taxonomy]]
category = "FLOOD"
patterns = ["flood"]
"#,
        )
        .unwrap();

        assert_eq!(config.top_k, 5);
        assert!(config.valid_regions.contains("IL"));
        assert_eq!(config.valid_regions.len(), 2);
        assert_eq!(config.date_format, "%Y-%m-%d");

        let taxonomy = config.compile_taxonomy().unwrap();
        assert_eq!(taxonomy.classify("FLASH FLOOD"), EventCategory::Flood);
        assert_eq!(taxonomy.classify("TORNADO"), EventCategory::Other);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            PipelineConfig::from_toml_str("top_k = 0"),
            Err(AnalyticsError::Config { .. })
        ));
        assert!(matches!(
            PipelineConfig::from_toml_str("valid_regions = []"),
            Err(AnalyticsError::Config { .. })
        ));
        assert!(matches!(
            PipelineConfig::from_toml_str("top_k = \"three\""),
            Err(AnalyticsError::Toml(_))
        ));
        assert!(matches!(
            PipelineConfig::from_toml_str(
                "[[taxonomy]]\ncategory = \"WINTER\"\npatterns = [\"sn(ow\"]\n"
            ),
            Err(AnalyticsError::Source(_))
        ));
    }

    #[test]
    fn default_roundtrips_through_toml() {
        let config = PipelineConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(PipelineConfig::from_toml_str(&text).unwrap(), config);
    }
}
