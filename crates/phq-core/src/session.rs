//! # Session
//!
//! Per-respondent questionnaire state.
//!
//! A session walks through the nine items as response/ranking pairs:
//!
//! ```text
//! question_index = k     --record_response-->  awaiting ranking for item k
//! awaiting ranking for k --record_ranking--->  question_index = k + 1
//! question_index = 9     --------------------> NextStep::Complete
//! ```
//!
//! Rejected operations never touch the counters.

use crate::analysis::Analysis;
use crate::questionnaire::{QUESTION_COUNT, question};
use crate::summary::Summary;
use crate::{Polarity, Ranking, ScoringError, SequenceViolation};
use serde::Serialize;

/// What the respondent should see next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// Ask the item at `index` (zero-based).
    Ask {
        index: usize,
        question: &'static str,
    },
    /// All items ranked; emit the summary.
    Complete,
}

/// Accumulated answers for one respondent.
///
/// Serialize-only; the counters are kept in step by `record_*`:
///
/// ```compile_fail
/// fn deserializable<T: serde::de::DeserializeOwned>() {}
/// deserializable::<phq_core::Session>();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    question_index: usize,
    rankings: Vec<Ranking>,
    sentiments: Vec<Polarity>,
    keyword_counts: Vec<u32>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero-based index of the current item (9 once complete).
    #[must_use]
    pub fn question_index(&self) -> usize {
        self.question_index
    }

    #[must_use]
    pub fn rankings(&self) -> &[Ranking] {
        &self.rankings
    }

    #[must_use]
    pub fn sentiments(&self) -> &[Polarity] {
        &self.sentiments
    }

    #[must_use]
    pub fn keyword_counts(&self) -> &[u32] {
        &self.keyword_counts
    }

    /// All nine items ranked.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.question_index >= QUESTION_COUNT
    }

    /// A response was recorded for the current item but no ranking yet.
    #[must_use]
    pub fn awaiting_ranking(&self) -> bool {
        self.sentiments.len() > self.rankings.len()
    }

    #[must_use]
    pub fn next_step(&self) -> NextStep {
        match question(self.question_index) {
            Some(question) => NextStep::Ask {
                index: self.question_index,
                question,
            },
            None => NextStep::Complete,
        }
    }

    /// Record the analysis of a free-text answer to the current item.
    pub fn record_response(&mut self, analysis: Analysis) -> Result<(), ScoringError> {
        if self.is_complete() {
            return Err(ScoringError::OutOfSequence(
                SequenceViolation::QuestionnaireComplete,
            ));
        }
        if self.awaiting_ranking() {
            return Err(ScoringError::OutOfSequence(
                SequenceViolation::ResponseAlreadyRecorded,
            ));
        }

        self.sentiments.push(analysis.polarity);
        self.keyword_counts.push(analysis.keyword_count);
        Ok(())
    }

    /// Record the ranking for the current item and advance.
    pub fn record_ranking(&mut self, ranking: Ranking) -> Result<(), ScoringError> {
        if self.is_complete() {
            return Err(ScoringError::OutOfSequence(
                SequenceViolation::QuestionnaireComplete,
            ));
        }
        if !self.awaiting_ranking() {
            return Err(ScoringError::OutOfSequence(
                SequenceViolation::RankingWithoutResponse,
            ));
        }

        self.rankings.push(ranking);
        self.question_index += 1;
        Ok(())
    }

    /// Summary over everything recorded so far.
    #[must_use]
    pub fn summarize(&self) -> Summary {
        Summary::compute(&self.rankings, &self.sentiments, &self.keyword_counts)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::QUESTIONS;
    use crate::severity::Severity;

    fn analysis(polarity: i32, keyword_count: u32) -> Analysis {
        Analysis {
            polarity: Polarity::from_thousandths(polarity),
            keyword_count,
        }
    }

    fn ranking(value: i64) -> Ranking {
        Ranking::new(value).unwrap_or_else(|e| panic!("{e}"))
    }

    fn answer(session: &mut Session, value: i64) {
        assert!(session.record_response(analysis(0, 0)).is_ok());
        assert!(session.record_ranking(ranking(value)).is_ok());
    }

    #[test]
    fn new_session_asks_first_item() {
        let session = Session::new();
        assert_eq!(
            session.next_step(),
            NextStep::Ask {
                index: 0,
                question: QUESTIONS[0]
            }
        );
    }

    #[test]
    fn pair_advances_index() {
        let mut session = Session::new();
        answer(&mut session, 2);
        assert_eq!(session.question_index(), 1);
        assert_eq!(session.rankings(), &[ranking(2)]);
        assert_eq!(session.sentiments().len(), 1);
        assert_eq!(session.keyword_counts().len(), 1);
    }

    #[test]
    fn nine_pairs_complete_with_equal_lengths() {
        let mut session = Session::new();
        for _ in 0..QUESTION_COUNT {
            answer(&mut session, 1);
        }
        assert!(session.is_complete());
        assert_eq!(session.next_step(), NextStep::Complete);
        assert_eq!(session.rankings().len(), 9);
        assert_eq!(session.sentiments().len(), 9);
        assert_eq!(session.keyword_counts().len(), 9);
        assert_eq!(session.summarize().severity, Severity::Mild);
    }

    #[test]
    fn ranking_without_response_is_rejected() {
        let mut session = Session::new();
        let before = session.clone();
        assert_eq!(
            session.record_ranking(ranking(1)),
            Err(ScoringError::OutOfSequence(
                SequenceViolation::RankingWithoutResponse
            ))
        );
        assert_eq!(session, before);
    }

    #[test]
    fn second_response_is_rejected() {
        let mut session = Session::new();
        assert!(session.record_response(analysis(-500, 1)).is_ok());
        let before = session.clone();
        assert_eq!(
            session.record_response(analysis(100, 0)),
            Err(ScoringError::OutOfSequence(
                SequenceViolation::ResponseAlreadyRecorded
            ))
        );
        assert_eq!(session, before);
    }

    #[test]
    fn complete_session_rejects_answers() {
        let mut session = Session::new();
        for _ in 0..QUESTION_COUNT {
            answer(&mut session, 0);
        }
        let before = session.clone();
        assert_eq!(
            session.record_response(analysis(0, 0)),
            Err(ScoringError::OutOfSequence(
                SequenceViolation::QuestionnaireComplete
            ))
        );
        assert_eq!(
            session.record_ranking(ranking(0)),
            Err(ScoringError::OutOfSequence(
                SequenceViolation::QuestionnaireComplete
            ))
        );
        assert_eq!(session, before);
    }

    #[test]
    fn summary_tracks_sentiment_and_keywords() {
        let mut session = Session::new();
        let answers = [(-500, 2, 3), (100, 0, 1), (-300, 1, 2)];
        for (polarity, keywords, value) in answers {
            assert!(session.record_response(analysis(polarity, keywords)).is_ok());
            assert!(session.record_ranking(ranking(value)).is_ok());
        }
        let summary = session.summarize();
        assert_eq!(summary.total_score, 6);
        assert_eq!(summary.negative_count, 2);
        assert_eq!(summary.total_keywords, 3);
    }
}
