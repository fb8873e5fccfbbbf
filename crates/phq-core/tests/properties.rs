//! Property tests for the scoring engine.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use phq_core::{
    Analysis, LexiconAnalyzer, NextStep, Polarity, QUESTION_COUNT, Ranking, ScoringError, Session,
    SessionId, SessionStore, Severity, Summary, TextAnalyzer,
};
use proptest::prelude::*;

fn full_session(values: &[u8]) -> Session {
    let mut session = Session::new();
    for value in values {
        session.record_response(Analysis::default()).unwrap();
        session
            .record_ranking(Ranking::new(i64::from(*value)).unwrap())
            .unwrap();
    }
    session
}

proptest! {
    #[test]
    fn severity_buckets_cover_the_scale(total in 0u32..=27) {
        let expected = match total {
            0..=4 => "minimal depression",
            5..=9 => "mild depression",
            10..=14 => "moderate depression",
            15..=19 => "moderately severe depression",
            _ => "severe depression",
        };
        prop_assert_eq!(Severity::from_total(total).label(), expected);
    }

    #[test]
    fn nine_pairs_keep_lengths_aligned(values in prop::collection::vec(0u8..=3, QUESTION_COUNT)) {
        let session = full_session(&values);
        prop_assert_eq!(session.rankings().len(), QUESTION_COUNT);
        prop_assert_eq!(session.sentiments().len(), QUESTION_COUNT);
        prop_assert_eq!(session.keyword_counts().len(), QUESTION_COUNT);
        prop_assert_eq!(session.next_step(), NextStep::Complete);

        let expected: u32 = values.iter().map(|v| u32::from(*v)).sum();
        prop_assert_eq!(session.summarize().total_score, expected);
    }

    #[test]
    fn lengths_match_index_between_pairs(values in prop::collection::vec(0u8..=3, 0..QUESTION_COUNT)) {
        let session = full_session(&values);
        prop_assert_eq!(session.rankings().len(), session.question_index());
        prop_assert_eq!(session.sentiments().len(), session.question_index());
        prop_assert_eq!(session.keyword_counts().len(), session.question_index());
    }

    #[test]
    fn negative_count_matches_strict_cutoff(raw in prop::collection::vec(-1000i32..=1000, 0..20)) {
        let sentiments: Vec<Polarity> = raw.iter().map(|p| Polarity::from_thousandths(*p)).collect();
        let expected = raw.iter().filter(|p| **p < -200).count() as u32;
        prop_assert_eq!(Summary::compute(&[], &sentiments, &[]).negative_count, expected);
    }

    #[test]
    fn out_of_range_rankings_are_rejected(value in prop_oneof![i64::MIN..0i64, 4i64..i64::MAX]) {
        prop_assert_eq!(Ranking::new(value), Err(ScoringError::InvalidRanking(value)));
    }

    #[test]
    fn polarity_stays_in_range(text in "[a-z ']{0,80}") {
        let analysis = LexiconAnalyzer::new().analyze(&text);
        let p = analysis.polarity.thousandths();
        prop_assert!((-1000..=1000).contains(&p));
        prop_assert!(analysis.keyword_count <= 9);
    }

    #[test]
    fn rejected_ranking_leaves_session_untouched(answered in 0usize..QUESTION_COUNT, value in 0i64..=3) {
        let mut store = SessionStore::new(4);
        let id = SessionId::parse("prop").unwrap();
        let session = store.get_or_create(&id);
        for _ in 0..answered {
            session.record_response(Analysis::default()).unwrap();
            session.record_ranking(Ranking::new(1).unwrap()).unwrap();
        }
        let before = session.clone();

        // No response recorded for the current item yet
        prop_assert!(session.record_ranking(Ranking::new(value).unwrap()).is_err());
        prop_assert_eq!(store.peek(&id), Some(&before));
    }
}

#[test]
fn spec_examples() {
    let session = full_session(&[3, 3, 3, 3, 3, 0, 0, 0, 0]);
    let summary = session.summarize();
    assert_eq!(summary.total_score, 15);
    assert_eq!(summary.severity.label(), "moderately severe depression");

    let analysis = LexiconAnalyzer::new().analyze("I feel so sad and hopeless");
    assert!(analysis.keyword_count >= 2);
}
