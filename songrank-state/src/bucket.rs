use serde::{Deserialize, Serialize};

use crate::parse_number;

/// A score range selected in the score filter, written as `"min-max"`.
///
/// Buckets are open at the top when `max` is 10, so `"9-10"` catches every
/// score from 9 up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ScoreBucket {
    label: String,
    min: f64,
    max: f64,
}
impl ScoreBucket {
    /// The buckets offered by the score filter, highest first.
    pub const PRESETS: [&str; 6] = ["9-10", "8-9", "7-8", "6-7", "5-6", "0-5"];

    /// Parses a bucket. Never fails: a side that doesn't parse becomes NaN,
    /// which never excludes anything.
    pub fn parse(label: &str) -> Self {
        let mut sides = label.split('-');
        let min = sides.next().map(parse_number).unwrap_or(f64::NAN);
        let max = sides.next().map(parse_number).unwrap_or(f64::NAN);
        Self {
            label: label.to_string(),
            min,
            max,
        }
    }

    /// All of [`Self::PRESETS`], parsed.
    pub fn presets() -> Vec<Self> {
        Self::PRESETS.iter().map(|label| Self::parse(label)).collect()
    }

    /// The label this bucket was parsed from.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The lower bound.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// The upper bound.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Whether a song with `score` belongs in this bucket.
    ///
    /// Evaluated as exclusion rules, so that NaN on either side never
    /// excludes a song.
    pub fn contains(&self, score: f64) -> bool {
        let excluded = if self.max == 10.0 {
            score < self.min
        } else if self.min == 0.0 {
            // HACK: the bottom bucket is pinned to "below 5" whatever its
            // upper bound says. Existing data files rely on it.
            score >= 5.0
        } else {
            score < self.min || score >= self.max
        };
        !excluded
    }
}
impl From<String> for ScoreBucket {
    fn from(label: String) -> Self {
        Self::parse(&label)
    }
}
impl From<ScoreBucket> for String {
    fn from(bucket: ScoreBucket) -> Self {
        bucket.label
    }
}
impl std::fmt::Display for ScoreBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}
