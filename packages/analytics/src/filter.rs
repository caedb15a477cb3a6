//! Analysis window and region domain filtering.
//!
//! Convection events were recorded decades before any other category, so
//! the window starts at the earliest year of a non-convection record. The
//! window ends at the latest year present in the input. Records outside the
//! window or outside the valid region set are dropped and counted.

use storm_impact_analytics_models::AnalysisWindow;
use storm_impact_event_models::EventCategory;
use storm_impact_geography_models::RegionSet;
use storm_impact_source_models::ClassifiedRecord;

use crate::AnalyticsError;

/// Records that survived filtering plus drop counts.
#[derive(Debug, Clone)]
pub struct FilterOutput {
    /// Retained records, in input order.
    pub records: Vec<ClassifiedRecord>,
    /// The window the records were filtered to.
    pub window: AnalysisWindow,
    /// Records dropped for falling outside the window.
    pub out_of_window: usize,
    /// Records inside the window dropped for having an invalid region.
    pub out_of_domain: usize,
}

/// Computes the analysis window for `records`.
///
/// Both bounds are taken over every record passed in, before any region
/// filtering: `min_year` is the earliest year of a non-convection record,
/// `max_year` the latest year of any record. A record from outside the
/// valid region set can therefore widen the window.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyDomain`] if no record has a category
/// other than [`EventCategory::Convection`].
pub fn compute_window(records: &[ClassifiedRecord]) -> Result<AnalysisWindow, AnalyticsError> {
    let min_year = records
        .iter()
        .filter(|r| r.category != EventCategory::Convection)
        .map(ClassifiedRecord::year)
        .min()
        .ok_or(AnalyticsError::EmptyDomain)?;

    let max_year = records
        .iter()
        .map(ClassifiedRecord::year)
        .max()
        .ok_or(AnalyticsError::EmptyDomain)?;

    Ok(AnalysisWindow { min_year, max_year })
}

/// Keeps records inside the computed window whose region is in `regions`.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyDomain`] if the window cannot be computed.
pub fn filter_records(
    records: Vec<ClassifiedRecord>,
    regions: &RegionSet,
) -> Result<FilterOutput, AnalyticsError> {
    let window = compute_window(&records)?;
    log::info!(
        "Analysis window: {}-{} ({} valid regions)",
        window.min_year,
        window.max_year,
        regions.len()
    );

    let mut out_of_window = 0;
    let mut out_of_domain = 0;

    let retained: Vec<ClassifiedRecord> = records
        .into_iter()
        .filter(|r| {
            if !window.contains(r.year()) {
                out_of_window += 1;
                false
            } else if !regions.contains(r.region()) {
                out_of_domain += 1;
                false
            } else {
                true
            }
        })
        .collect();

    log::info!(
        "Retained {} records ({out_of_window} outside window, {out_of_domain} outside region set)",
        retained.len()
    );

    Ok(FilterOutput {
        records: retained,
        window,
        out_of_window,
        out_of_domain,
    })
}
