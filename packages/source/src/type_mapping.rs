//! Event type classification.
//!
//! Maps free-text event type labels to the canonical [`EventCategory`]
//! taxonomy. The source vocabulary has hundreds of spelling variants
//! (`"TSTM WIND"`, `"THUNDERSTORM WINDS"`, `"LIGNTNING"`, ...), so each
//! category is described by a set of case-insensitive patterns rather than
//! exact labels. Rules are checked in priority order and the first category
//! with any matching pattern wins; [`EventCategory::Other`] is the fallback.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use rayon::prelude::*;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use storm_impact_event_models::EventCategory;
use storm_impact_source_models::{ClassifiedRecord, NormalizedRecord};

use crate::SourceError;

/// One configurable taxonomy entry: a category and the patterns that select
/// it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyRule {
    /// Category assigned when any pattern matches.
    pub category: EventCategory,
    /// Regular expressions, matched case-insensitively anywhere in the label.
    pub patterns: Vec<String>,
}

impl TaxonomyRule {
    fn new(category: EventCategory, patterns: &[&str]) -> Self {
        Self {
            category,
            patterns: patterns.iter().map(|p| (*p).to_owned()).collect(),
        }
    }
}

/// The built-in taxonomy rules in priority order.
#[must_use]
pub fn default_rules() -> Vec<TaxonomyRule> {
    vec![
        TaxonomyRule::new(
            EventCategory::Convection,
            &[
                // LIGHTNING, LIGHTING, LIGNTNING
                r"\bl\S*ng\b",
                "torn",
                "funnel",
                "thunderstorm|tstm",
                "wi?nd",
                "hail",
            ],
        ),
        TaxonomyRule::new(EventCategory::ExtremeTemperature, &["cold", "heat"]),
        TaxonomyRule::new(
            EventCategory::Flood,
            &[
                // FLOOD, FLOODING, FLD, FLDG
                r"\bfl\w*d",
                "rain",
                "precip",
                "shower",
            ],
        ),
        TaxonomyRule::new(
            EventCategory::Winter,
            &["snow", "ice", "icy", "freez", "wint"],
        ),
    ]
}

/// A compiled, priority-ordered taxonomy.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    rules: Vec<(EventCategory, Vec<Regex>)>,
}

impl Taxonomy {
    /// Compiles `rules` in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidPattern`] if a pattern is not a valid
    /// regular expression, or [`SourceError::InvalidTaxonomy`] if a category
    /// appears twice or [`EventCategory::Other`] is given a rule (it is
    /// always the fallback).
    pub fn compile(rules: &[TaxonomyRule]) -> Result<Self, SourceError> {
        let mut seen = BTreeSet::new();
        let mut compiled = Vec::with_capacity(rules.len());

        for rule in rules {
            if rule.category == EventCategory::Other {
                return Err(SourceError::InvalidTaxonomy {
                    message: "OTHER is the fallback category and cannot have a rule".to_owned(),
                });
            }
            if !seen.insert(rule.category) {
                return Err(SourceError::InvalidTaxonomy {
                    message: format!("duplicate rule for {}", rule.category),
                });
            }

            let patterns = rule
                .patterns
                .iter()
                .map(|pattern| {
                    RegexBuilder::new(pattern)
                        .case_insensitive(true)
                        .build()
                        .map_err(|source| SourceError::InvalidPattern {
                            category: rule.category,
                            pattern: pattern.clone(),
                            source,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            compiled.push((rule.category, patterns));
        }

        Ok(Self { rules: compiled })
    }

    /// Returns the highest-priority category whose patterns match `text`,
    /// or [`EventCategory::Other`] if none do.
    #[must_use]
    pub fn classify(&self, text: &str) -> EventCategory {
        self.rules
            .iter()
            .find(|(_, patterns)| patterns.iter().any(|re| re.is_match(text)))
            .map_or(EventCategory::Other, |(category, _)| *category)
    }

    /// Categories with rules, in priority order.
    pub fn categories(&self) -> impl Iterator<Item = EventCategory> + '_ {
        self.rules.iter().map(|(category, _)| *category)
    }
}

static DEFAULT_TAXONOMY: LazyLock<Taxonomy> = LazyLock::new(|| {
    Taxonomy::compile(&default_rules()).expect("built-in taxonomy patterns are valid")
});

impl Default for Taxonomy {
    fn default() -> Self {
        DEFAULT_TAXONOMY.clone()
    }
}

/// Classifies a raw event type label with the built-in taxonomy.
#[must_use]
pub fn map_event_type(raw: &str) -> EventCategory {
    DEFAULT_TAXONOMY.classify(raw)
}

/// Attaches a category to every record, in parallel.
///
/// Output order matches input order.
#[must_use]
pub fn classify_all(records: Vec<NormalizedRecord>, taxonomy: &Taxonomy) -> Vec<ClassifiedRecord> {
    records
        .into_par_iter()
        .map(|record| {
            let category = taxonomy.classify(&record.event_type);
            ClassifiedRecord { record, category }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn maps_convection_types() {
        for label in [
            "TORNADO",
            "TSTM WIND",
            "THUNDERSTORM WINDS",
            "HAIL",
            "LIGHTNING",
            "LIGNTNING",
            "LIGHTING",
            "FUNNEL CLOUD",
            "HIGH WIND",
            "WND",
            "Marine Thunderstorm Wind",
        ] {
            assert_eq!(
                map_event_type(label),
                EventCategory::Convection,
                "{label} should be convection"
            );
        }
    }

    #[test]
    fn maps_other_categories() {
        assert_eq!(
            map_event_type("EXTREME COLD"),
            EventCategory::ExtremeTemperature
        );
        assert_eq!(
            map_event_type("Excessive Heat"),
            EventCategory::ExtremeTemperature
        );
        assert_eq!(map_event_type("FLASH FLOOD"), EventCategory::Flood);
        assert_eq!(map_event_type("URBAN/SML STREAM FLD"), EventCategory::Flood);
        assert_eq!(map_event_type("HEAVY RAIN"), EventCategory::Flood);
        assert_eq!(map_event_type("RECORD PRECIPITATION"), EventCategory::Flood);
        assert_eq!(map_event_type("HEAVY SNOW"), EventCategory::Winter);
        assert_eq!(map_event_type("ICE STORM"), EventCategory::Winter);
        assert_eq!(map_event_type("ICY ROADS"), EventCategory::Winter);
        assert_eq!(map_event_type("FROST/FREEZE"), EventCategory::Winter);
        assert_eq!(map_event_type("WINTER WEATHER"), EventCategory::Winter);
    }

    #[test]
    fn higher_priority_wins() {
        assert_eq!(
            map_event_type("THUNDERSTORM WIND/FLASH FLOOD"),
            EventCategory::Convection
        );
        assert_eq!(map_event_type("HAIL/ICY ROADS"), EventCategory::Convection);
        assert_eq!(
            map_event_type("COLD AND SNOW"),
            EventCategory::ExtremeTemperature
        );
        assert_eq!(map_event_type("FREEZING RAIN"), EventCategory::Flood);
    }

    #[test]
    fn unknown_fallback() {
        for label in ["DENSE FOG", "RIP CURRENT", "HURRICANE/TYPHOON", "", "?"] {
            assert_eq!(map_event_type(label), EventCategory::Other, "{label:?}");
        }
    }

    #[test]
    fn classification_is_total() {
        for label in ["TORNADO", "SNOW", "whatever", "FLOOD", "HEAT", "  "] {
            assert!(EventCategory::all().contains(&map_event_type(label)));
        }
    }

    #[test]
    fn custom_rules_respect_order() {
        let taxonomy = Taxonomy::compile(&[
            TaxonomyRule::new(EventCategory::Winter, &["snow"]),
            TaxonomyRule::new(EventCategory::Convection, &["snow|wind"]),
        ])
        .unwrap();
        assert_eq!(taxonomy.classify("SNOW AND WIND"), EventCategory::Winter);
        assert_eq!(taxonomy.classify("WIND"), EventCategory::Convection);
        assert_eq!(taxonomy.classify("HEAT"), EventCategory::Other);
        assert_eq!(
            taxonomy.categories().collect::<Vec<_>>(),
            vec![EventCategory::Winter, EventCategory::Convection]
        );
    }

    #[test]
    fn rejects_invalid_pattern() {
        let err = Taxonomy::compile(&[TaxonomyRule::new(EventCategory::Flood, &["fl(ood"])])
            .unwrap_err();
        assert!(matches!(
            err,
            SourceError::InvalidPattern {
                category: EventCategory::Flood,
                ..
            }
        ));
    }

    #[test]
    fn rejects_other_and_duplicate_rules() {
        assert!(Taxonomy::compile(&[TaxonomyRule::new(EventCategory::Other, &["x"])]).is_err());
        assert!(
            Taxonomy::compile(&[
                TaxonomyRule::new(EventCategory::Flood, &["flood"]),
                TaxonomyRule::new(EventCategory::Flood, &["rain"]),
            ])
            .is_err()
        );
    }

    #[test]
    fn classify_all_preserves_order() {
        let date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let records: Vec<NormalizedRecord> = ["TORNADO", "DENSE FOG", "HEAVY SNOW"]
            .iter()
            .map(|label| NormalizedRecord {
                event_type: (*label).to_owned(),
                region: "IL".to_owned(),
                property_damage: 0.0,
                crop_damage: 0.0,
                fatalities: 0,
                injuries: 0,
                begin_date: date,
            })
            .collect();

        let classified = classify_all(records, &Taxonomy::default());
        let categories: Vec<EventCategory> = classified.iter().map(|r| r.category).collect();
        assert_eq!(
            categories,
            vec![
                EventCategory::Convection,
                EventCategory::Other,
                EventCategory::Winter
            ]
        );
    }
}
