//! Outcome melting, grouped totals, RMS scaling and ranking.
//!
//! Each retained record is melted into one [`OutcomeRow`] per
//! [`OutcomeKind`]. All grouped tables are folded into `BTreeMap`s keyed by
//! their grouping columns, so summation order and output order are the same
//! on every run.

use std::collections::BTreeMap;

use rayon::prelude::*;
use storm_impact_analytics_models::{
    CategoryTotal, OutcomeRow, StateAggregate, StateCategoryAggregate, YearTotal,
};
use storm_impact_event_models::OutcomeKind;
use storm_impact_source_models::ClassifiedRecord;

/// Melts one record into exactly one row per outcome kind, in
/// [`OutcomeKind::all`] order.
#[must_use]
pub fn melt(record: &ClassifiedRecord) -> [OutcomeRow; 3] {
    let row = |outcome: OutcomeKind| OutcomeRow {
        region: record.region().to_owned(),
        year: record.year(),
        category: record.category,
        outcome,
        value: raw_outcome(record, outcome) / outcome.unit_divisor(),
    };

    [
        row(OutcomeKind::Fatalities),
        row(OutcomeKind::Injuries),
        row(OutcomeKind::PropertyDamage),
    ]
}

/// Melts every record, preserving input order.
#[must_use]
pub fn melt_all(records: &[ClassifiedRecord]) -> Vec<OutcomeRow> {
    records.par_iter().flat_map_iter(melt).collect()
}

fn raw_outcome(record: &ClassifiedRecord, outcome: OutcomeKind) -> f64 {
    match outcome {
        OutcomeKind::Fatalities => f64::from(record.record.fatalities),
        OutcomeKind::Injuries => f64::from(record.record.injuries),
        OutcomeKind::PropertyDamage => record.record.property_damage,
    }
}

/// Sums `value(item)` grouped by `key(item)`.
pub fn sum_by_key<T, K, KF, VF>(items: &[T], key: KF, value: VF) -> BTreeMap<K, f64>
where
    K: Ord,
    KF: Fn(&T) -> K,
    VF: Fn(&T) -> f64,
{
    items.iter().fold(BTreeMap::new(), |mut acc, item| {
        *acc.entry(key(item)).or_insert(0.0) += value(item);
        acc
    })
}

/// Root-mean-square of `value(item)` grouped by `key(item)`.
///
/// This is the non-centered standard deviation: `sqrt(sum(x²) / n)`, with
/// no mean subtracted and divisor `n`.
pub fn rms_by_key<T, K, KF, VF>(items: &[T], key: KF, value: VF) -> BTreeMap<K, f64>
where
    K: Ord,
    KF: Fn(&T) -> K,
    VF: Fn(&T) -> f64,
{
    let mut groups: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for item in items {
        let v = value(item);
        let entry = groups.entry(key(item)).or_insert((0.0, 0));
        entry.0 += v * v;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(k, (sum_sq, n))| {
            #[allow(clippy::cast_precision_loss)]
            let rms = (sum_sq / n as f64).sqrt();
            (k, rms)
        })
        .collect()
}

/// Divides `value` by `scale`, treating a zero scale as yielding zero.
#[must_use]
pub fn scale_value(value: f64, scale: f64) -> f64 {
    if scale > 0.0 { value / scale } else { 0.0 }
}

/// Totals per (region, category, outcome), each with its value scaled by
/// the RMS of all totals for the same outcome.
#[must_use]
pub fn state_category_aggregates(rows: &[OutcomeRow]) -> Vec<StateCategoryAggregate> {
    let sums = sum_by_key(
        rows,
        |r| (r.region.clone(), r.category, r.outcome),
        |r| r.value,
    );

    let mut aggregates: Vec<StateCategoryAggregate> = sums
        .into_iter()
        .map(|((region, category, outcome), value)| StateCategoryAggregate {
            region,
            category,
            outcome,
            value,
            scaled_value: 0.0,
        })
        .collect();

    let scales = rms_by_key(&aggregates, |a| a.outcome, |a| a.value);
    for aggregate in &mut aggregates {
        let scale = scales.get(&aggregate.outcome).copied().unwrap_or(0.0);
        aggregate.scaled_value = scale_value(aggregate.value, scale);
    }

    aggregates
}

/// Totals per (region, outcome), ranked within each outcome.
///
/// Rank 1 is the largest total. Equal totals are ordered by region code so
/// that ranks are reproducible. Output is grouped by outcome and sorted by
/// rank.
#[must_use]
pub fn state_aggregates(rows: &[OutcomeRow]) -> Vec<StateAggregate> {
    let sums = sum_by_key(rows, |r| (r.outcome, r.region.clone()), |r| r.value);

    let mut by_outcome: BTreeMap<OutcomeKind, Vec<(String, f64)>> = BTreeMap::new();
    for ((outcome, region), value) in sums {
        by_outcome.entry(outcome).or_default().push((region, value));
    }

    let mut aggregates = Vec::new();
    for (outcome, mut totals) in by_outcome {
        totals.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        aggregates.extend(
            totals
                .into_iter()
                .zip(1u32..)
                .map(|((region, value), rank)| StateAggregate {
                    region,
                    outcome,
                    value,
                    rank,
                }),
        );
    }

    aggregates
}

/// National totals per (category, outcome).
#[must_use]
pub fn category_totals(rows: &[OutcomeRow]) -> Vec<CategoryTotal> {
    sum_by_key(rows, |r| (r.category, r.outcome), |r| r.value)
        .into_iter()
        .map(|((category, outcome), value)| CategoryTotal {
            category,
            outcome,
            value,
        })
        .collect()
}

/// National totals per (year, outcome).
#[must_use]
pub fn yearly_totals(rows: &[OutcomeRow]) -> Vec<YearTotal> {
    sum_by_key(rows, |r| (r.year, r.outcome), |r| r.value)
        .into_iter()
        .map(|((year, outcome), value)| YearTotal {
            year,
            outcome,
            value,
        })
        .collect()
}
