//! Request and response bodies.

use crate::scorer::{Acknowledgment, Prompt};
use phq_core::{QUESTION_COUNT, Summary};
use serde::{Deserialize, Serialize};

// =============================================================================
// REQUESTS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseRequest {
    pub response: String,
}

/// `ranking` may arrive as a JSON integer or a numeric string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingRequest {
    pub ranking: RankingValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RankingValue {
    Integer(i64),
    Text(String),
}

impl RankingValue {
    /// Integer value, or `None` for non-integer input.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

// =============================================================================
// RESPONSES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryView {
    pub total_score: u32,
    pub severity: String,
    pub negative_count: u32,
    pub total_keywords: u32,
    pub guidance: String,
}

impl From<&Summary> for SummaryView {
    fn from(summary: &Summary) -> Self {
        Self {
            total_score: summary.total_score,
            severity: summary.severity.label().to_string(),
            negative_count: summary.negative_count,
            total_keywords: summary.total_keywords,
            guidance: summary.severity.guidance().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub message: String,
    pub is_summary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_number: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_questions: Option<usize>,
    /// The current item already has a response; post only the ranking.
    #[serde(default)]
    pub awaiting_ranking: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryView>,
}

impl From<Prompt> for QuestionResponse {
    fn from(prompt: Prompt) -> Self {
        match prompt {
            Prompt::Question {
                number,
                total,
                text,
                awaiting_ranking,
            } => Self {
                message: text,
                is_summary: false,
                question_number: Some(number),
                total_questions: Some(total),
                awaiting_ranking,
                summary: None,
            },
            Prompt::Summary(summary) => Self {
                message: summary.message(),
                is_summary: true,
                question_number: None,
                total_questions: Some(QUESTION_COUNT),
                awaiting_ranking: false,
                summary: Some(SummaryView::from(&summary)),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcknowledgmentResponse {
    pub acknowledgment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_ranking: Option<u8>,
}

impl From<Acknowledgment> for AcknowledgmentResponse {
    fn from(ack: Acknowledgment) -> Self {
        Self {
            acknowledgment: ack.text,
            suggested_ranking: ack.suggested.map(|f| f.score()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub active_sessions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
