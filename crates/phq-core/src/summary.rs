//! # Summary
//!
//! Aggregate result emitted once all nine items are ranked.

use crate::severity::Severity;
use crate::{Polarity, Ranking};
use serde::{Deserialize, Serialize};

/// Aggregate of a completed (or partial) questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Sum of all rankings.
    pub total_score: u32,
    /// Bucket for `total_score`.
    pub severity: Severity,
    /// Answers whose polarity fell below the negative cut-off.
    pub negative_count: u32,
    /// Sum of per-answer keyword counts.
    pub total_keywords: u32,
}

impl Summary {
    /// Compute from the three per-question sequences.
    #[must_use]
    pub fn compute(rankings: &[Ranking], sentiments: &[Polarity], keyword_counts: &[u32]) -> Self {
        let total_score: u32 = rankings.iter().map(|r| u32::from(r.value())).sum();
        let negative_count = sentiments.iter().filter(|p| p.is_negative()).count() as u32;
        let total_keywords = keyword_counts
            .iter()
            .fold(0u32, |acc, count| acc.saturating_add(*count));

        Self {
            total_score,
            severity: Severity::from_total(total_score),
            negative_count,
            total_keywords,
        }
    }

    /// The summary sentence shown to the respondent.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "Based on your PHQ-9 score of {}, you may be experiencing {}. \
             Your responses showed {} negative sentiments and {} keywords. \
             Please consult a professional.",
            self.total_score,
            self.severity.label(),
            self.negative_count,
            self.total_keywords
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rankings(values: &[i64]) -> Vec<Ranking> {
        values.iter().filter_map(|v| Ranking::new(*v).ok()).collect()
    }

    #[test]
    fn moderately_severe_example() {
        let summary = Summary::compute(&rankings(&[3, 3, 3, 3, 3, 0, 0, 0, 0]), &[], &[]);
        assert_eq!(summary.total_score, 15);
        assert_eq!(summary.severity, Severity::ModeratelySevere);
    }

    #[test]
    fn negative_count_uses_strict_cutoff() {
        let sentiments = [
            Polarity::from_thousandths(-500),
            Polarity::from_thousandths(100),
            Polarity::from_thousandths(-300),
        ];
        let summary = Summary::compute(&[], &sentiments, &[]);
        assert_eq!(summary.negative_count, 2);

        let edge = Summary::compute(&[], &[Polarity::from_thousandths(-200)], &[]);
        assert_eq!(edge.negative_count, 0);
    }

    #[test]
    fn keywords_are_summed() {
        let summary = Summary::compute(&[], &[], &[2, 0, 1, 3]);
        assert_eq!(summary.total_keywords, 6);
    }

    #[test]
    fn message_template() {
        let summary = Summary {
            total_score: 12,
            severity: Severity::Moderate,
            negative_count: 3,
            total_keywords: 5,
        };
        assert_eq!(
            summary.message(),
            "Based on your PHQ-9 score of 12, you may be experiencing moderate depression. \
             Your responses showed 3 negative sentiments and 5 keywords. \
             Please consult a professional."
        );
    }
}
