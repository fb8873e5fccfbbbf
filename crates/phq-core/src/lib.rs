//! # PHQ Core
//!
//! Deterministic scoring engine for the PHQ-9 screening service.
//!
//! This crate holds everything that makes a decision:
//! - The fixed questionnaire and keyword set
//! - Text analysis (lexicon polarity + keyword counting)
//! - Per-session accumulation of rankings, sentiments and keyword counts
//! - Summary computation and severity buckets
//! - A bounded, caller-managed session store
//!
//! ## Constraints
//!
//! - No async, no network, no randomness
//! - No floating-point arithmetic: polarity is kept in integer thousandths
//! - `BTreeMap` for every keyed collection
//!
//! Generative rephrasing and the HTTP surface live in `apps/phq`.

pub mod analysis;
pub mod questionnaire;
pub mod session;
pub mod severity;
pub mod store;
pub mod summary;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use analysis::{AckBucket, Analysis, LexiconAnalyzer, TextAnalyzer, count_keywords};
pub use questionnaire::{Frequency, KEYWORDS, QUESTION_COUNT, QUESTIONS, infer_frequency};
pub use session::{NextStep, Session};
pub use severity::Severity;
pub use store::{SessionStore, StoreStats};
pub use summary::Summary;

// =============================================================================
// ERRORS
// =============================================================================

/// Which ordering rule a request broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceViolation {
    /// A ranking arrived for a question that has no recorded response.
    RankingWithoutResponse,
    /// A second response arrived before the current question was ranked.
    ResponseAlreadyRecorded,
    /// All nine questions have been ranked; only the summary remains.
    QuestionnaireComplete,
}

impl fmt::Display for SequenceViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::RankingWithoutResponse => "ranking submitted without a matching response",
            Self::ResponseAlreadyRecorded => "response already recorded for this question",
            Self::QuestionnaireComplete => "questionnaire already complete",
        };
        f.write_str(text)
    }
}

/// Errors raised by scoring operations.
///
/// All variants are recoverable: the offending request is rejected and the
/// session is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    /// Ranking outside the PHQ-9 item range.
    #[error("Ranking {0} out of valid range 0..=3")]
    InvalidRanking(i64),

    /// Operation invoked before the session was created.
    #[error("No active session; request a question first")]
    MissingSession,

    /// Response/ranking pairs arrived in the wrong order.
    #[error("Out of sequence: {0}")]
    OutOfSequence(SequenceViolation),
}

// =============================================================================
// SESSION ID
// =============================================================================

/// Maximum accepted length of a session identifier.
pub const MAX_SESSION_ID_LEN: usize = 64;

/// Opaque session identifier assigned by the transport layer.
///
/// The core never generates identifiers; it only checks their shape.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SessionId(String);

impl SessionId {
    /// Parse an identifier, accepting ASCII alphanumerics and `-` only.
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = !raw.is_empty()
            && raw.len() <= MAX_SESSION_ID_LEN
            && raw.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-');
        valid.then(|| Self(raw.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// RANKING
// =============================================================================

/// A validated PHQ-9 item score (0-3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Ranking(u8);

impl Ranking {
    /// Highest score a single item can take.
    pub const MAX: u8 = 3;

    /// Validate a raw value.
    pub fn new(value: i64) -> Result<Self, ScoringError> {
        match u8::try_from(value) {
            Ok(v) if v <= Self::MAX => Ok(Self(v)),
            _ => Err(ScoringError::InvalidRanking(value)),
        }
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Ranking {
    type Error = ScoringError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Ranking> for u8 {
    fn from(ranking: Ranking) -> Self {
        ranking.0
    }
}

// =============================================================================
// POLARITY
// =============================================================================

/// Sentiment polarity in [-1, 1], stored as integer thousandths.
///
/// `Polarity::from_thousandths(-350)` is a polarity of -0.35.
///
/// Only built through the clamping constructor; there is no `Deserialize`:
///
/// ```compile_fail
/// fn deserializable<T: serde::de::DeserializeOwned>() {}
/// deserializable::<phq_core::Polarity>();
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Polarity(i16);

impl Polarity {
    pub const MIN: Self = Self(-1000);
    pub const MAX: Self = Self(1000);
    pub const NEUTRAL: Self = Self(0);

    /// Strictly below this counts as negative (-0.2).
    pub const NEGATIVE_THRESHOLD: Self = Self(-200);
    /// Strictly above this counts as positive (0.2).
    pub const POSITIVE_THRESHOLD: Self = Self(200);

    /// Build from thousandths, clamping into [-1000, 1000].
    #[must_use]
    pub fn from_thousandths(value: i32) -> Self {
        Self(value.clamp(-1000, 1000) as i16)
    }

    #[must_use]
    pub fn thousandths(self) -> i16 {
        self.0
    }

    /// Below the negative cut-off.
    #[must_use]
    pub fn is_negative(self) -> bool {
        self < Self::NEGATIVE_THRESHOLD
    }

    /// Acknowledgment bucket for this polarity.
    #[must_use]
    pub fn bucket(self) -> AckBucket {
        if self < Self::NEGATIVE_THRESHOLD {
            AckBucket::Negative
        } else if self > Self::POSITIVE_THRESHOLD {
            AckBucket::Positive
        } else {
            AckBucket::Neutral
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:03}", sign, abs / 1000, abs % 1000)
    }
}

// =============================================================================
// TESTS
// =============================================================================
