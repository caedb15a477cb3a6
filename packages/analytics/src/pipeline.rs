//! End-to-end pipeline: normalize, classify, filter, aggregate, report.

use std::sync::Arc;
use std::time::Instant;

use storm_impact_analytics_models::{PipelineReport, PipelineSummary};
use storm_impact_event_models::EventCategory;
use storm_impact_source::normalize::normalize_all;
use storm_impact_source::progress::ProgressCallback;
use storm_impact_source::type_mapping::{Taxonomy, classify_all};
use storm_impact_source_models::RawRecord;

use crate::AnalyticsError;
use crate::aggregate::{
    category_totals, melt_all, state_aggregates, state_category_aggregates, yearly_totals,
};
use crate::config::PipelineConfig;
use crate::filter::filter_records;
use crate::report::{UnitFormatter, build_report};

/// A configured pipeline with its taxonomy compiled.
pub struct Pipeline {
    config: PipelineConfig,
    taxonomy: Taxonomy,
}

impl Pipeline {
    /// Validates `config` and compiles its taxonomy.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError`] if the configuration is invalid.
    pub fn new(config: PipelineConfig) -> Result<Self, AnalyticsError> {
        config.validate()?;
        let taxonomy = config.compile_taxonomy()?;
        log::debug!(
            "Taxonomy rules in priority order: {:?}",
            taxonomy.categories().collect::<Vec<_>>()
        );
        Ok(Self { config, taxonomy })
    }

    /// The configuration this pipeline was built from.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Classifies a single event type label.
    #[must_use]
    pub fn classify(&self, event_type: &str) -> EventCategory {
        self.taxonomy.classify(event_type)
    }

    /// Runs every stage over `raws` and returns all output tables.
    ///
    /// Records with malformed begin dates, outside the analysis window, or
    /// outside the valid region set are dropped and counted in the summary.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::EmptyDomain`] if no non-convection record
    /// survives normalization.
    pub fn run(
        &self,
        raws: &[RawRecord],
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<PipelineReport, AnalyticsError> {
        let start = Instant::now();
        log::info!("Running pipeline over {} records", raws.len());

        let normalized = normalize_all(raws, &self.config.date_format, progress);
        let classified = classify_all(normalized.records, &self.taxonomy);
        log::debug!("Classified {} records", classified.len());

        let filtered = filter_records(classified, &self.config.valid_regions)?;

        let rows = melt_all(&filtered.records);
        let state_category = state_category_aggregates(&rows);
        let state = state_aggregates(&rows);
        let report = build_report(&state, &state_category, self.config.top_k, &UnitFormatter);

        let summary = PipelineSummary {
            input_records: raws.len(),
            malformed_dates: normalized.malformed_dates,
            out_of_window: filtered.out_of_window,
            out_of_domain: filtered.out_of_domain,
            retained_records: filtered.records.len(),
            window: filtered.window,
        };

        log::info!(
            "Pipeline complete in {:.2}s: {} outcome rows, {} region/category totals, {} report rows",
            start.elapsed().as_secs_f64(),
            rows.len(),
            state_category.len(),
            report.len()
        );

        Ok(PipelineReport {
            summary,
            category_totals: category_totals(&rows),
            yearly_totals: yearly_totals(&rows),
            state_category,
            state,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use storm_impact_analytics_models::AnalysisWindow;
    use storm_impact_event_models::OutcomeKind;
    use storm_impact_source::normalize::normalize_record;
    use storm_impact_source::progress::null_progress;
    use storm_impact_source_models::{ClassifiedRecord, DamageField};

    use super::*;
    use crate::aggregate::melt;

    const TOLERANCE: f64 = 1e-12;

    fn raw(region: &str, event_type: &str, fatalities: u32, injuries: u32, year: i32) -> RawRecord {
        RawRecord {
            event_type: event_type.to_owned(),
            region: region.to_owned(),
            property_damage: DamageField::new(0.0, ""),
            crop_damage: DamageField::new(0.0, ""),
            fatalities,
            injuries,
            begin_date: format!("6/15/{year} 0:00:00"),
        }
    }

    fn scenario() -> Vec<RawRecord> {
        vec![
            raw("IL", "EXTREME COLD", 10, 0, 2000),
            raw("TX", "FLASH FLOOD", 0, 20, 2001),
            raw("IL", "TORNADO", 5, 0, 1999),
        ]
    }

    fn value_of(report: &PipelineReport, region: &str, outcome: OutcomeKind) -> (f64, u32) {
        let a = report
            .state
            .iter()
            .find(|a| a.region == region && a.outcome == outcome)
            .unwrap();
        (a.value, a.rank)
    }

    #[test]
    fn scenario_categories() {
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        let categories: Vec<EventCategory> = scenario()
            .iter()
            .map(|r| pipeline.classify(&r.event_type))
            .collect();
        assert_eq!(
            categories,
            vec![
                EventCategory::ExtremeTemperature,
                EventCategory::Flood,
                EventCategory::Convection
            ]
        );
    }

    #[test]
    fn scenario_window_drops_early_convection() {
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        let report = pipeline.run(&scenario(), &null_progress()).unwrap();

        assert_eq!(
            report.summary.window,
            AnalysisWindow {
                min_year: 2000,
                max_year: 2001
            }
        );
        assert_eq!(report.summary.input_records, 3);
        assert_eq!(report.summary.out_of_window, 1);
        assert_eq!(report.summary.retained_records, 2);

        let (il, il_rank) = value_of(&report, "IL", OutcomeKind::Fatalities);
        assert!((il - 0.010).abs() < TOLERANCE);
        assert_eq!(il_rank, 1);

        let (tx, tx_rank) = value_of(&report, "TX", OutcomeKind::Injuries);
        assert!((tx - 0.020).abs() < TOLERANCE);
        assert_eq!(tx_rank, 1);
    }

    #[test]
    fn scenario_totals_before_windowing() {
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        let records: Vec<_> = scenario()
            .iter()
            .map(|r| {
                let record = normalize_record(r, &pipeline.config().date_format).unwrap();
                let category = pipeline.classify(&record.event_type);
                ClassifiedRecord { record, category }
            })
            .collect();
        let rows: Vec<_> = records.iter().flat_map(melt).collect();
        let state = state_aggregates(&rows);

        let il = state
            .iter()
            .find(|a| a.region == "IL" && a.outcome == OutcomeKind::Fatalities)
            .unwrap();
        assert!((il.value - 0.015).abs() < TOLERANCE);
        assert_eq!(il.rank, 1);
    }

    #[test]
    fn counts_malformed_dates_and_invalid_regions() {
        let mut raws = scenario();
        raws.push(RawRecord {
            begin_date: "unknown".to_owned(),
            ..raw("IL", "HAIL", 1, 1, 2000)
        });
        raws.push(raw("PR", "HEAVY RAIN", 3, 0, 2000));
        raws.push(raw("dc", "HEAT", 1, 0, 2001));

        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        let summary = pipeline.run(&raws, &null_progress()).unwrap().summary;

        assert_eq!(summary.input_records, 6);
        assert_eq!(summary.malformed_dates, 1);
        assert_eq!(summary.out_of_window, 1);
        assert_eq!(summary.out_of_domain, 2);
        assert_eq!(summary.retained_records, 2);
    }

    #[test]
    fn convection_only_input_aborts() {
        let raws = vec![raw("IL", "TORNADO", 1, 0, 1990), raw("KS", "HAIL", 0, 1, 1991)];
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        assert!(matches!(
            pipeline.run(&raws, &null_progress()),
            Err(AnalyticsError::EmptyDomain)
        ));
    }

    #[test]
    fn report_rows_respect_top_k() {
        let raws = vec![
            raw("IL", "FLOOD", 4, 0, 2000),
            raw("TX", "FLOOD", 3, 0, 2000),
            raw("MO", "FLOOD", 2, 0, 2000),
            raw("KS", "FLOOD", 1, 0, 2000),
        ];
        let config = PipelineConfig {
            top_k: 2,
            ..PipelineConfig::default()
        };
        let report = Pipeline::new(config)
            .unwrap()
            .run(&raws, &null_progress())
            .unwrap();

        let fatalities: Vec<&str> = report
            .report
            .iter()
            .filter(|r| r.outcome == OutcomeKind::Fatalities)
            .map(|r| r.region.as_str())
            .collect();
        assert_eq!(fatalities, vec!["IL", "TX"]);
        assert_eq!(report.report[0].formatted_value, "0.004K");
    }

    #[test]
    fn rejects_invalid_config() {
        let config = PipelineConfig {
            top_k: 0,
            ..PipelineConfig::default()
        };
        assert!(Pipeline::new(config).is_err());
    }
}
