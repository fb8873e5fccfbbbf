//! Session scorer: the questionnaire flow around the core engine.
//!
//! Holds the session store and the two collaborators (rephraser, analyzer).
//! The store lock is only held for core bookkeeping, never across a model call.

use crate::rephraser::{Rephraser, fallback_acknowledgment};
use phq_core::{
    AckBucket, Frequency, NextStep, QUESTION_COUNT, Ranking, ScoringError, SessionId, SessionStore,
    StoreStats, Summary, TextAnalyzer, infer_frequency,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// What `get_next_prompt` hands back to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// A (possibly rephrased) questionnaire item.
    Question {
        /// 1-based position of the item.
        number: usize,
        total: usize,
        text: String,
        /// The response to this item is recorded; only its ranking is missing.
        awaiting_ranking: bool,
    },
    /// Final summary; the session has been cleared.
    Summary(Summary),
}

impl Prompt {
    #[must_use]
    pub fn is_summary(&self) -> bool {
        matches!(self, Self::Summary(_))
    }

    /// Text shown to the respondent.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Question { text, .. } => text.clone(),
            Self::Summary(summary) => summary.message(),
        }
    }
}

/// Reply to a recorded free-text answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgment {
    pub text: String,
    pub bucket: AckBucket,
    /// Answer option the text most likely describes, if any.
    pub suggested: Option<Frequency>,
}

pub struct SessionScorer {
    store: Mutex<SessionStore>,
    rephraser: Arc<dyn Rephraser>,
    analyzer: Arc<dyn TextAnalyzer>,
}

impl SessionScorer {
    pub fn new(
        rephraser: Arc<dyn Rephraser>,
        analyzer: Arc<dyn TextAnalyzer>,
        max_sessions: usize,
    ) -> Self {
        Self {
            store: Mutex::new(SessionStore::new(max_sessions)),
            rephraser,
            analyzer,
        }
    }

    /// Next item for the session, or its summary once all nine are ranked.
    ///
    /// Creates the session if it does not exist. Emitting the summary
    /// removes the session, so the following call starts over.
    pub async fn get_next_prompt(&self, id: &SessionId) -> Prompt {
        let (index, question, awaiting_ranking) = {
            let mut store = self.store.lock().await;
            let session = store.get_or_create(id);
            match session.next_step() {
                NextStep::Ask { index, question } => {
                    (index, question, session.awaiting_ranking())
                }
                NextStep::Complete => {
                    let summary = session.summarize();
                    store.complete(id);
                    info!(
                        session = %id,
                        total_score = summary.total_score,
                        severity = %summary.severity,
                        "Questionnaire completed"
                    );
                    return Prompt::Summary(summary);
                }
            }
        };

        let text = match self.rephraser.rephrase(question).await {
            Ok(text) => text,
            Err(e) => {
                warn!(session = %id, error = %e, "Rephrasing failed, using original question");
                question.to_string()
            }
        };

        debug!(session = %id, question = index + 1, awaiting_ranking, "Serving question");
        Prompt::Question {
            number: index + 1,
            total: QUESTION_COUNT,
            text,
            awaiting_ranking,
        }
    }

    /// Analyze and record a free-text answer to the current item.
    pub async fn record_response(
        &self,
        id: &SessionId,
        response: &str,
    ) -> Result<Acknowledgment, ScoringError> {
        let analysis = self.analyzer.analyze(response);
        {
            let mut store = self.store.lock().await;
            let session = store.get_mut(id).ok_or(ScoringError::MissingSession)?;
            session.record_response(analysis)?;
        }

        let bucket = analysis.polarity.bucket();
        debug!(
            session = %id,
            bucket = bucket.as_str(),
            keywords = analysis.keyword_count,
            "Response recorded"
        );

        let text = match self.rephraser.acknowledge(bucket).await {
            Ok(text) => text,
            Err(e) => {
                warn!(session = %id, error = %e, "Acknowledgment failed, using fallback");
                fallback_acknowledgment(bucket).to_string()
            }
        };

        Ok(Acknowledgment {
            text,
            bucket,
            suggested: infer_frequency(response),
        })
    }

    /// Validate and record the ranking for the current item.
    ///
    /// Returns how many items have been ranked so far.
    pub async fn record_ranking(&self, id: &SessionId, value: i64) -> Result<usize, ScoringError> {
        let ranking = Ranking::new(value)?;
        let mut store = self.store.lock().await;
        let session = store.get_mut(id).ok_or(ScoringError::MissingSession)?;
        session.record_ranking(ranking)?;
        debug!(session = %id, answered = session.question_index(), "Ranking recorded");
        Ok(session.question_index())
    }

    pub async fn stats(&self) -> StoreStats {
        self.store.lock().await.stats()
    }
}

// =============================================================================
// TESTS
// =============================================================================
