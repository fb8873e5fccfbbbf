//! # Questionnaire
//!
//! The fixed PHQ-9 items, the depression keyword set, and the four standard
//! answer options.

use crate::analysis::words;
use serde::{Deserialize, Serialize};

/// Number of items in the PHQ-9.
pub const QUESTION_COUNT: usize = 9;

/// The PHQ-9 items, in administration order.
pub const QUESTIONS: [&str; QUESTION_COUNT] = [
    "Do you have little interest or pleasure in doing things?",
    "Are you feeling down, depressed, or hopeless?",
    "Do you have trouble falling or staying asleep, or sleeping too much?",
    "Are you feeling tired or having little energy?",
    "Do you have poor appetite or are you overeating?",
    "Are you feeling bad about yourself — or that you are a failure or have let yourself or your family down?",
    "Do you have trouble concentrating on things, such as reading the newspaper or watching television?",
    "Are you moving or speaking so slowly that other people could have noticed? Or the opposite — being so fidgety or restless that you have been moving around a lot more than usual?",
    "Do you have thoughts that you would be better off dead, or of hurting yourself in some way?",
];

/// Lowercase trigger words counted in free-text answers.
pub const KEYWORDS: [&str; 9] = [
    "sad",
    "depressed",
    "hopeless",
    "tired",
    "failure",
    "concentrate",
    "restless",
    "dead",
    "hurt",
];

/// Negation that turns a frequency cue into "not at all".
const NEGATOR: &str = "not";

/// Question text at a zero-based index.
#[must_use]
pub fn question(index: usize) -> Option<&'static str> {
    QUESTIONS.get(index).copied()
}

// =============================================================================
// ANSWER OPTIONS
// =============================================================================

/// The four standard PHQ-9 answer options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    NotAtAll,
    SeveralDays,
    MoreThanHalfTheDays,
    NearlyEveryDay,
}

impl Frequency {
    pub const ALL: [Self; 4] = [
        Self::NotAtAll,
        Self::SeveralDays,
        Self::MoreThanHalfTheDays,
        Self::NearlyEveryDay,
    ];

    #[must_use]
    pub fn score(self) -> u8 {
        match self {
            Self::NotAtAll => 0,
            Self::SeveralDays => 1,
            Self::MoreThanHalfTheDays => 2,
            Self::NearlyEveryDay => 3,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::NotAtAll => "Not at all",
            Self::SeveralDays => "Several days",
            Self::MoreThanHalfTheDays => "More than half the days",
            Self::NearlyEveryDay => "Nearly every day",
        }
    }

    fn cues(self) -> &'static [&'static str] {
        match self {
            Self::NotAtAll => &["not at all", "never", "no", NEGATOR],
            Self::SeveralDays => &["several days", "sometimes", "a little"],
            Self::MoreThanHalfTheDays => &["more than half", "often", "frequently"],
            Self::NearlyEveryDay => &["nearly every day", "always", "all the time"],
        }
    }
}

/// Suggest an answer option for a free-text reply.
///
/// Multi-word cues are tried first, then single words, each pass in order
/// 0→3 and on whole words only. "not" is itself a "not at all" cue, and a
/// phrase right after "not" is skipped, so "not often" and "not nearly every day"
/// land on 0 rather than the high end. Returns `None` when no cue is present.
#[must_use]
pub fn infer_frequency(text: &str) -> Option<Frequency> {
    let tokens = words(text);
    let found = |cue: &str| {
        let cue_tokens: Vec<&str> = cue.split(' ').collect();
        let negated = |start: usize| start > 0 && tokens[start - 1] == NEGATOR;
        tokens
            .windows(cue_tokens.len())
            .enumerate()
            .any(|(start, window)| {
                window.iter().zip(&cue_tokens).all(|(t, c)| t == c)
                    && !(cue_tokens.len() > 1 && negated(start))
            })
    };
    let pass = |phrases: bool| {
        Frequency::ALL.into_iter().find(|freq| {
            freq.cues()
                .iter()
                .filter(|cue| cue.contains(' ') == phrases)
                .any(|cue| found(*cue))
        })
    };

    pass(true).or_else(|| pass(false))
}

// =============================================================================
// TESTS
// =============================================================================
