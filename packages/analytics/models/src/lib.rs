#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Table types produced by the storm impact pipeline.
//!
//! Every table is a plain ordered `Vec` of rows with named fields so that
//! downstream renderers (charts, HTML tables, JSON exports) can consume them
//! without knowing anything about how they were computed.

use serde::{Deserialize, Serialize};
use storm_impact_event_models::{EventCategory, OutcomeKind};

/// Inclusive range of years retained for analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisWindow {
    /// Earliest retained year.
    pub min_year: i32,
    /// Latest retained year.
    pub max_year: i32,
}

impl AnalysisWindow {
    /// Returns `true` if `year` falls inside the window.
    #[must_use]
    pub const fn contains(&self, year: i32) -> bool {
        self.min_year <= year && year <= self.max_year
    }
}

/// One outcome value for one event, in long form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeRow {
    /// Region code.
    pub region: String,
    /// Calendar year of the event.
    pub year: i32,
    /// Event category.
    pub category: EventCategory,
    /// Which outcome this row measures.
    pub outcome: OutcomeKind,
    /// Value divided by [`OutcomeKind::unit_divisor`].
    pub value: f64,
}

/// Total outcome per (region, category, outcome).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateCategoryAggregate {
    /// Region code.
    pub region: String,
    /// Event category.
    pub category: EventCategory,
    /// Outcome measured.
    pub outcome: OutcomeKind,
    /// Summed value in scaled units.
    pub value: f64,
    /// `value` divided by the root-mean-square of all values for the same
    /// outcome, making outcomes comparable on one axis.
    pub scaled_value: f64,
}

/// Total outcome per (region, outcome), ranked within the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateAggregate {
    /// Region code.
    pub region: String,
    /// Outcome measured.
    pub outcome: OutcomeKind,
    /// Summed value in scaled units.
    pub value: f64,
    /// 1 for the largest total within this outcome.
    pub rank: u32,
}

/// Total outcome per (category, outcome) across all regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    /// Event category.
    pub category: EventCategory,
    /// Outcome measured.
    pub outcome: OutcomeKind,
    /// Summed value in scaled units.
    pub value: f64,
}

/// Total outcome per (year, outcome) across all regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearTotal {
    /// Calendar year.
    pub year: i32,
    /// Outcome measured.
    pub outcome: OutcomeKind,
    /// Summed value in scaled units.
    pub value: f64,
}

/// One row of the top-regions report, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    /// Outcome this row belongs to.
    pub outcome: OutcomeKind,
    /// Region code.
    pub region: String,
    /// Event category.
    pub category: EventCategory,
    /// Summed value in scaled units.
    pub value: f64,
    /// Display string for `value` (e.g. `"$1,234.57B"`).
    pub formatted_value: String,
}

/// Record counts and the window computed during a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSummary {
    /// Records handed to the pipeline.
    pub input_records: usize,
    /// Records dropped because the begin date could not be parsed.
    pub malformed_dates: usize,
    /// Records dropped for falling outside the analysis window.
    pub out_of_window: usize,
    /// Records dropped for having a region outside the valid set.
    pub out_of_domain: usize,
    /// Records that made it into aggregation.
    pub retained_records: usize,
    /// The analysis window.
    pub window: AnalysisWindow,
}

/// Every table produced by one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineReport {
    /// Record counts and window.
    pub summary: PipelineSummary,
    /// Totals per (region, category, outcome).
    pub state_category: Vec<StateCategoryAggregate>,
    /// Ranked totals per (region, outcome).
    pub state: Vec<StateAggregate>,
    /// Top regions per outcome broken down by category.
    pub report: Vec<ReportRow>,
    /// National totals per (category, outcome).
    pub category_totals: Vec<CategoryTotal>,
    /// National totals per (year, outcome).
    pub yearly_totals: Vec<YearTotal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_inclusive() {
        let window = AnalysisWindow {
            min_year: 1996,
            max_year: 2011,
        };
        assert!(window.contains(1996));
        assert!(window.contains(2011));
        assert!(!window.contains(1995));
        assert!(!window.contains(2012));
    }

    #[test]
    fn rows_serialize_camel_case() {
        let row = StateAggregate {
            region: "IL".to_owned(),
            outcome: OutcomeKind::PropertyDamage,
            value: 1.5,
            rank: 2,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["outcome"], "PROPERTY_DAMAGE");
        assert_eq!(json["rank"], 2);
    }
}
