//! Top-region report tables.
//!
//! For each outcome, the regions ranked within the top `k` are selected and
//! their per-category totals projected into [`ReportRow`]s sorted by
//! descending value. Display formatting is delegated to a
//! [`ValueFormatter`].

use std::collections::BTreeSet;

use storm_impact_analytics_models::{ReportRow, StateAggregate, StateCategoryAggregate};
use storm_impact_event_models::OutcomeKind;

/// Formats scaled outcome values for display.
pub trait ValueFormatter: Send + Sync {
    /// Returns the display string for `value` of the given outcome.
    fn format(&self, outcome: OutcomeKind, value: f64) -> String;
}

/// Formats values with thousands separators, the outcome's unit suffix and
/// a `$` prefix for monetary outcomes. Decimals come from
/// [`OutcomeKind::display_decimals`], so a single fatality or a thousand
/// dollars of damage never renders as zero.
///
/// `1234.567` property damage becomes `"$1,234.567000B"`, `0.004`
/// fatalities becomes `"0.004K"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitFormatter;

impl ValueFormatter for UnitFormatter {
    fn format(&self, outcome: OutcomeKind, value: f64) -> String {
        let sign = if value < 0.0 { "-" } else { "" };
        let currency = if outcome.is_monetary() { "$" } else { "" };
        format!(
            "{sign}{currency}{}{}",
            with_thousands_separator(value.abs(), outcome.display_decimals()),
            outcome.unit_label()
        )
    }
}

/// Formats a non-negative number with `,` thousands separators and a fixed
/// number of decimals.
#[must_use]
pub fn with_thousands_separator(value: f64, decimals: usize) -> String {
    let fixed = format!("{value:.decimals$}");
    let (int_part, frac_part) = fixed
        .split_once('.')
        .map_or((fixed.as_str(), None), |(i, f)| (i, Some(f)));

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Builds the report rows for every outcome, in [`OutcomeKind::all`] order.
///
/// Within an outcome, rows are sorted by descending value, then by region
/// and category.
#[must_use]
pub fn build_report(
    state: &[StateAggregate],
    state_category: &[StateCategoryAggregate],
    top_k: usize,
    formatter: &dyn ValueFormatter,
) -> Vec<ReportRow> {
    let mut rows = Vec::new();

    for outcome in OutcomeKind::all() {
        let selected: BTreeSet<&str> = top_regions(state, *outcome, top_k).collect();
        log::debug!("Top {top_k} regions for {}: {selected:?}", outcome.label());

        let mut projected: Vec<&StateCategoryAggregate> = state_category
            .iter()
            .filter(|a| a.outcome == *outcome && selected.contains(a.region.as_str()))
            .collect();
        projected.sort_by(|a, b| {
            b.value
                .total_cmp(&a.value)
                .then_with(|| a.region.cmp(&b.region))
                .then_with(|| a.category.cmp(&b.category))
        });

        rows.extend(projected.into_iter().map(|a| ReportRow {
            outcome: a.outcome,
            region: a.region.clone(),
            category: a.category,
            value: a.value,
            formatted_value: formatter.format(a.outcome, a.value),
        }));
    }

    rows
}

/// Regions ranked `1..=top_k` for `outcome`.
pub fn top_regions(
    state: &[StateAggregate],
    outcome: OutcomeKind,
    top_k: usize,
) -> impl Iterator<Item = &str> {
    state
        .iter()
        .filter(move |a| a.outcome == outcome && (a.rank as usize) <= top_k)
        .map(|a| a.region.as_str())
}

#[cfg(test)]
mod tests {
    use storm_impact_event_models::EventCategory;

    use super::*;

    fn state(region: &str, outcome: OutcomeKind, value: f64, rank: u32) -> StateAggregate {
        StateAggregate {
            region: region.to_owned(),
            outcome,
            value,
            rank,
        }
    }

    fn state_category(
        region: &str,
        category: EventCategory,
        outcome: OutcomeKind,
        value: f64,
    ) -> StateCategoryAggregate {
        StateCategoryAggregate {
            region: region.to_owned(),
            category,
            outcome,
            value,
            scaled_value: 0.0,
        }
    }

    #[test]
    fn formats_with_separators() {
        assert_eq!(with_thousands_separator(0.0, 2), "0.00");
        assert_eq!(with_thousands_separator(999.999, 2), "1,000.00");
        assert_eq!(with_thousands_separator(1_234_567.891, 2), "1,234,567.89");
        assert_eq!(with_thousands_separator(123_456.0, 0), "123,456");
    }

    #[test]
    fn unit_formatter_adds_units() {
        let f = UnitFormatter;
        assert_eq!(f.format(OutcomeKind::PropertyDamage, 1234.567), "$1,234.567000B");
        assert_eq!(f.format(OutcomeKind::Injuries, 12.3), "12.300K");
        assert_eq!(f.format(OutcomeKind::Fatalities, -1.0), "-1.000K");
    }

    #[test]
    fn unit_formatter_keeps_small_values_visible() {
        let f = UnitFormatter;
        assert_eq!(f.format(OutcomeKind::Fatalities, 0.004), "0.004K");
        assert_eq!(f.format(OutcomeKind::Injuries, 0.002), "0.002K");
        assert_eq!(f.format(OutcomeKind::PropertyDamage, 0.003), "$0.003000B");
        assert_eq!(f.format(OutcomeKind::PropertyDamage, 0.000_025), "$0.000025B");
    }

    #[test]
    fn selects_top_k_and_sorts_descending() {
        let o = OutcomeKind::Fatalities;
        let states = vec![
            state("TX", o, 9.0, 1),
            state("IL", o, 5.0, 2),
            state("MO", o, 4.0, 3),
            state("KS", o, 1.0, 4),
        ];
        let by_category = vec![
            state_category("TX", EventCategory::Flood, o, 6.0),
            state_category("TX", EventCategory::Convection, o, 3.0),
            state_category("IL", EventCategory::ExtremeTemperature, o, 5.0),
            state_category("MO", EventCategory::Convection, o, 4.0),
            state_category("KS", EventCategory::Convection, o, 1.0),
            state_category("KS", EventCategory::Winter, o, 8.0),
        ];

        let rows = build_report(&states, &by_category, 2, &UnitFormatter);
        let projected: Vec<(&str, EventCategory)> =
            rows.iter().map(|r| (r.region.as_str(), r.category)).collect();
        assert_eq!(
            projected,
            vec![
                ("TX", EventCategory::Flood),
                ("IL", EventCategory::ExtremeTemperature),
                ("TX", EventCategory::Convection),
            ]
        );
        assert_eq!(rows[0].formatted_value, "6.000K");
    }

    #[test]
    fn report_covers_every_outcome_in_order() {
        let states = vec![
            state("TX", OutcomeKind::PropertyDamage, 2.0, 1),
            state("TX", OutcomeKind::Fatalities, 1.0, 1),
        ];
        let by_category = vec![
            state_category("TX", EventCategory::Flood, OutcomeKind::PropertyDamage, 2.0),
            state_category("TX", EventCategory::Flood, OutcomeKind::Fatalities, 1.0),
        ];
        let rows = build_report(&states, &by_category, 3, &UnitFormatter);
        let outcomes: Vec<OutcomeKind> = rows.iter().map(|r| r.outcome).collect();
        assert_eq!(
            outcomes,
            vec![OutcomeKind::Fatalities, OutcomeKind::PropertyDamage]
        );
    }
}
