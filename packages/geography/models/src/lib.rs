#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geographic domain types.
//!
//! The analysis only keeps records from a fixed set of valid region codes.
//! That set is injected through [`RegionSet`] rather than assumed, with the
//! 50 US states as the default.

pub mod states;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A set of valid region codes.
///
/// Codes are stored trimmed and uppercased, and membership checks apply the
/// same normalization, so `"il"` and `"IL"` are the same region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct RegionSet {
    codes: BTreeSet<String>,
}

impl RegionSet {
    /// Creates a region set from arbitrary codes.
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            codes: codes
                .into_iter()
                .map(|c| normalize_code(c.as_ref()))
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }

    /// The 50 US states.
    #[must_use]
    pub fn us_states() -> Self {
        Self::new(states::STATE_ABBRS)
    }

    /// Returns `true` if `code` is a member of this set.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(&normalize_code(code))
    }

    /// Number of codes in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns `true` if the set has no codes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Iterates codes in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }
}

impl Default for RegionSet {
    fn default() -> Self {
        Self::us_states()
    }
}

impl From<Vec<String>> for RegionSet {
    fn from(codes: Vec<String>) -> Self {
        Self::new(codes)
    }
}

impl From<RegionSet> for Vec<String> {
    fn from(set: RegionSet) -> Self {
        set.codes.into_iter().collect()
    }
}

/// Trims and uppercases a region code.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
