//! # Severity
//!
//! PHQ-9 severity buckets over the summed item scores.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest possible PHQ-9 total (9 items x 3).
pub const MAX_TOTAL_SCORE: u32 = 27;

/// Severity label derived from the total score.
///
/// Buckets are closed ranges: 0-4, 5-9, 10-14, 15-19, 20+.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Minimal,
    Mild,
    Moderate,
    ModeratelySevere,
    Severe,
}

impl Severity {
    pub const ALL: [Self; 5] = [
        Self::Minimal,
        Self::Mild,
        Self::Moderate,
        Self::ModeratelySevere,
        Self::Severe,
    ];

    /// Bucket a total score.
    #[must_use]
    pub fn from_total(total_score: u32) -> Self {
        match total_score {
            0..=4 => Self::Minimal,
            5..=9 => Self::Mild,
            10..=14 => Self::Moderate,
            15..=19 => Self::ModeratelySevere,
            _ => Self::Severe,
        }
    }

    /// Human-readable label used in the summary sentence.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Minimal => "minimal depression",
            Self::Mild => "mild depression",
            Self::Moderate => "moderate depression",
            Self::ModeratelySevere => "moderately severe depression",
            Self::Severe => "severe depression",
        }
    }

    /// Follow-up advice for the bucket.
    #[must_use]
    pub fn guidance(self) -> &'static str {
        match self {
            Self::Minimal => {
                "Keep monitoring your mood and seek help if you notice any changes."
            }
            Self::Mild => {
                "Consider talking to a mental health professional or a trusted person about your feelings."
            }
            Self::Moderate => {
                "It is recommended to seek help from a mental health professional."
            }
            Self::ModeratelySevere => {
                "Please seek help from a mental health professional as soon as possible."
            }
            Self::Severe => {
                "It is crucial to seek immediate help from a mental health professional or a crisis hotline."
            }
        }
    }

    /// Inclusive score range covered by the bucket.
    #[must_use]
    pub fn score_range(self) -> (u32, u32) {
        match self {
            Self::Minimal => (0, 4),
            Self::Mild => (5, 9),
            Self::Moderate => (10, 14),
            Self::ModeratelySevere => (15, 19),
            Self::Severe => (20, MAX_TOTAL_SCORE),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_edges() {
        assert_eq!(Severity::from_total(0), Severity::Minimal);
        assert_eq!(Severity::from_total(4), Severity::Minimal);
        assert_eq!(Severity::from_total(5), Severity::Mild);
        assert_eq!(Severity::from_total(9), Severity::Mild);
        assert_eq!(Severity::from_total(10), Severity::Moderate);
        assert_eq!(Severity::from_total(14), Severity::Moderate);
        assert_eq!(Severity::from_total(15), Severity::ModeratelySevere);
        assert_eq!(Severity::from_total(19), Severity::ModeratelySevere);
        assert_eq!(Severity::from_total(20), Severity::Severe);
        assert_eq!(Severity::from_total(27), Severity::Severe);
    }

    #[test]
    fn ranges_agree_with_buckets() {
        for severity in Severity::ALL {
            let (low, high) = severity.score_range();
            assert_eq!(Severity::from_total(low), severity);
            assert_eq!(Severity::from_total(high), severity);
        }
    }

    #[test]
    fn labels() {
        assert_eq!(Severity::ModeratelySevere.to_string(), "moderately severe depression");
        assert_eq!(Severity::Minimal.label(), "minimal depression");
    }
}
