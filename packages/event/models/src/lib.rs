#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Weather event taxonomy and outcome metric types.
//!
//! This crate defines the fixed, priority-ranked event category taxonomy
//! that every free-text event label is classified into, along with the
//! outcome metrics (fatalities, injuries, property damage) that are
//! aggregated per category.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Top-level weather event category.
///
/// Variants are declared in priority order: when a label matches the rules
/// of more than one category, the earliest variant wins. [`Self::Other`] is
/// the fallback for labels that match nothing.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCategory {
    /// Thunderstorms, tornadoes, lightning, wind and hail
    Convection,
    /// Excessive heat or cold
    ExtremeTemperature,
    /// Floods and heavy precipitation
    Flood,
    /// Snow, ice and freezing conditions
    Winter,
    /// Events that don't map to any other category
    Other,
}

impl EventCategory {
    /// Returns a human-readable label for this category.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Convection => "Convection",
            Self::ExtremeTemperature => "Extreme Temperature",
            Self::Flood => "Flood",
            Self::Winter => "Winter",
            Self::Other => "Other",
        }
    }

    /// Returns the priority rank of this category (0 is highest).
    #[must_use]
    pub const fn priority(self) -> u8 {
        self as u8
    }

    /// Returns all variants of this enum in priority order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Convection,
            Self::ExtremeTemperature,
            Self::Flood,
            Self::Winter,
            Self::Other,
        ]
    }
}

/// An outcome metric aggregated across events.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKind {
    /// Deaths attributed to the event
    Fatalities,
    /// Injuries attributed to the event
    Injuries,
    /// Resolved property damage in US dollars
    PropertyDamage,
}

impl OutcomeKind {
    /// Divisor applied to raw values when melting records into outcome
    /// rows. Casualties are reported in thousands of people, damage in
    /// billions of dollars.
    #[must_use]
    pub const fn unit_divisor(self) -> f64 {
        match self {
            Self::Fatalities | Self::Injuries => 1e3,
            Self::PropertyDamage => 1e9,
        }
    }

    /// Short suffix describing the scaled unit (`"K"` or `"B"`).
    #[must_use]
    pub const fn unit_label(self) -> &'static str {
        match self {
            Self::Fatalities | Self::Injuries => "K",
            Self::PropertyDamage => "B",
        }
    }

    /// Decimal places needed to display a scaled value without rounding a
    /// whole raw unit away: one person for casualties, one thousand dollars
    /// for damage.
    #[must_use]
    pub const fn display_decimals(self) -> usize {
        match self {
            Self::Fatalities | Self::Injuries => 3,
            Self::PropertyDamage => 6,
        }
    }

    /// Whether values of this kind are monetary.
    #[must_use]
    pub const fn is_monetary(self) -> bool {
        matches!(self, Self::PropertyDamage)
    }

    /// Returns a human-readable label for this outcome.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fatalities => "Fatalities",
            Self::Injuries => "Injuries",
            Self::PropertyDamage => "Property Damage",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Fatalities, Self::Injuries, Self::PropertyDamage]
    }
}
