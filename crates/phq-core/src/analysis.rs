//! # Analysis Module
//!
//! Sentiment and keyword heuristics for free-text answers.
//!
//! The scorer only depends on the [`TextAnalyzer`] trait, so any polarity
//! model can be plugged in. [`LexiconAnalyzer`] is the built-in one: a small
//! word lexicon with intensifiers and negation, computed entirely in integer
//! thousandths.

use crate::Polarity;
use crate::questionnaire::KEYWORDS;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// TYPES
// =============================================================================

/// Result of analyzing one free-text answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Analysis {
    /// Sentiment polarity of the text.
    pub polarity: Polarity,
    /// Number of distinct keywords found in the text.
    pub keyword_count: u32,
}

/// Which kind of acknowledgment an answer deserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AckBucket {
    Negative,
    Positive,
    Neutral,
}

impl AckBucket {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Negative => "negative",
            Self::Positive => "positive",
            Self::Neutral => "neutral",
        }
    }
}

/// Capability: turn an answer into polarity and keyword count.
pub trait TextAnalyzer: Send + Sync {
    fn analyze(&self, text: &str) -> Analysis;
}

// =============================================================================
// KEYWORDS
// =============================================================================

/// Count keywords occurring as substrings of the lowercased text.
///
/// Each keyword counts at most once, so "hurt" and "hurting" together still
/// count as one.
#[must_use]
pub fn count_keywords(text: &str) -> u32 {
    let lowered = text.to_lowercase();
    KEYWORDS.iter().filter(|k| lowered.contains(*k)).count() as u32
}

/// Lowercase word tokens (letters, digits and apostrophes).
pub(crate) fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '’'))
        .filter(|w| !w.is_empty())
        .map(|w| w.replace('’', "'"))
        .collect()
}

// =============================================================================
// LEXICON ANALYZER
// =============================================================================

/// Word polarities in thousandths.
const LEXICON: &[(&str, i32)] = &[
    // negative
    ("afraid", -600),
    ("alone", -300),
    ("angry", -500),
    ("anxious", -500),
    ("ashamed", -600),
    ("awful", -1000),
    ("bad", -700),
    ("crying", -400),
    ("dead", -200),
    ("depressed", -700),
    ("die", -500),
    ("difficult", -500),
    ("down", -155),
    ("drained", -400),
    ("empty", -100),
    ("exhausted", -600),
    ("failure", -300),
    ("guilty", -500),
    ("hard", -290),
    ("hate", -800),
    ("hopeless", -800),
    ("horrible", -1000),
    ("hurt", -500),
    ("lonely", -500),
    ("lost", -300),
    ("miserable", -1000),
    ("numb", -400),
    ("overwhelmed", -500),
    ("pain", -500),
    ("painful", -700),
    ("poor", -400),
    ("restless", -300),
    ("sad", -500),
    ("scared", -500),
    ("stressed", -500),
    ("struggling", -400),
    ("terrible", -1000),
    ("tired", -400),
    ("unhappy", -600),
    ("upset", -500),
    ("useless", -500),
    ("worried", -500),
    ("worse", -400),
    ("worst", -1000),
    ("worthless", -800),
    // positive
    ("amazing", 600),
    ("better", 500),
    ("best", 1000),
    ("calm", 300),
    ("cheerful", 600),
    ("enjoy", 400),
    ("enjoying", 400),
    ("energetic", 500),
    ("excellent", 1000),
    ("fine", 417),
    ("fun", 300),
    ("glad", 500),
    ("good", 700),
    ("grateful", 500),
    ("great", 800),
    ("happy", 800),
    ("hopeful", 500),
    ("interested", 250),
    ("love", 500),
    ("motivated", 500),
    ("nice", 600),
    ("ok", 500),
    ("okay", 500),
    ("peaceful", 500),
    ("pleasant", 700),
    ("positive", 227),
    ("relaxed", 300),
    ("rested", 300),
    ("wonderful", 1000),
];

/// Multipliers (thousandths) applied to the next scored word.
const INTENSIFIERS: &[(&str, i32)] = &[
    ("completely", 1300),
    ("extremely", 1500),
    ("incredibly", 1500),
    ("quite", 1100),
    ("really", 1300),
    ("slightly", 500),
    ("so", 1300),
    ("somewhat", 700),
    ("super", 1300),
    ("too", 1200),
    ("totally", 1200),
    ("very", 1300),
];

const NEGATORS: &[&str] = &["cannot", "neither", "never", "no", "nor", "not", "without"];

/// Negation flips and halves the scored word (-0.5x).
const NEGATION_FACTOR: i32 = -500;

/// Cap for chained intensifiers ("very very very ...").
const MAX_INTENSITY: i32 = 3000;

/// Scored word must follow a negator within this many tokens.
const NEGATION_WINDOW: u8 = 3;

/// Lexicon-based polarity with intensifiers and negation.
#[derive(Debug, Clone)]
pub struct LexiconAnalyzer {
    lexicon: BTreeMap<&'static str, i32>,
    intensifiers: BTreeMap<&'static str, i32>,
}

impl Default for LexiconAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconAnalyzer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        }
    }

    /// Polarity of `text` in thousandths, before clamping into a [`Polarity`].
    fn score(&self, text: &str) -> i32 {
        let mut total: i32 = 0;
        let mut scored: i32 = 0;
        let mut intensity: Option<i32> = None;
        let mut negation_left: u8 = 0;

        for word in words(text) {
            let word = word.as_str();

            if let Some(&value) = self.lexicon.get(word) {
                let mut value = value;
                if let Some(multiplier) = intensity.take() {
                    value = (value * multiplier / 1000).clamp(-1000, 1000);
                }
                if negation_left > 0 {
                    value = value * NEGATION_FACTOR / 1000;
                    negation_left = 0;
                }
                total = total.saturating_add(value);
                scored = scored.saturating_add(1);
                continue;
            }

            if let Some(&multiplier) = self.intensifiers.get(word) {
                let combined = match intensity {
                    Some(current) => current * multiplier / 1000,
                    None => multiplier,
                };
                intensity = Some(combined.min(MAX_INTENSITY));
                continue;
            }

            intensity = None;
            if NEGATORS.contains(&word) || word.ends_with("n't") {
                negation_left = NEGATION_WINDOW;
            } else {
                negation_left = negation_left.saturating_sub(1);
            }
        }

        if scored == 0 { 0 } else { total / scored }
    }
}

impl TextAnalyzer for LexiconAnalyzer {
    fn analyze(&self, text: &str) -> Analysis {
        Analysis {
            polarity: Polarity::from_thousandths(self.score(text)),
            keyword_count: count_keywords(text),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
