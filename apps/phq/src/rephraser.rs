//! Rephraser port and adapters.
//!
//! The scorer talks to the language model only through [`Rephraser`]:
//! - [`LlmRephraser`] calls an OpenAI-compatible `chat/completions` endpoint
//! - [`VerbatimRephraser`] returns questions unchanged and fixed acknowledgments
//!
//! Model output is free text with no latency or determinism guarantees, so
//! callers treat every error as "use the verbatim text instead".

use crate::config::LlmConfig;
use async_trait::async_trait;
use phq_core::AckBucket;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token cap for rephrased questions.
pub const REPHRASE_MAX_TOKENS: u32 = 50;

/// Token cap for acknowledgments.
pub const ACKNOWLEDGE_MAX_TOKENS: u32 = 30;

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, Error)]
pub enum RephraseError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Model returned an empty completion")]
    EmptyCompletion,

    #[error("Invalid model configuration: {0}")]
    Config(String),
}

// =============================================================================
// PORT
// =============================================================================

/// Capability: conversational wording around the fixed questionnaire.
#[async_trait]
pub trait Rephraser: Send + Sync {
    /// Reword a PHQ-9 item conversationally.
    async fn rephrase(&self, original_question: &str) -> Result<String, RephraseError>;

    /// Short acknowledgment for an answer in the given bucket.
    async fn acknowledge(&self, bucket: AckBucket) -> Result<String, RephraseError>;
}

/// Prompt sent to the model to reword a question.
#[must_use]
pub fn rephrase_prompt(original_question: &str) -> String {
    format!(
        "Rephrase this question in a conversational, therapist-like way: {}",
        original_question
    )
}

/// Prompt sent to the model for an acknowledgment.
#[must_use]
pub fn acknowledgment_prompt(bucket: AckBucket) -> &'static str {
    match bucket {
        AckBucket::Negative => "Generate an empathetic response for a negative sentiment.",
        AckBucket::Positive => "Generate a positive acknowledgment.",
        AckBucket::Neutral => "Generate a neutral acknowledgment.",
    }
}

/// Acknowledgment used when no model is available.
#[must_use]
pub fn fallback_acknowledgment(bucket: AckBucket) -> &'static str {
    match bucket {
        AckBucket::Negative => {
            "That sounds really hard. Thank you for being open with me about it."
        }
        AckBucket::Positive => "I'm glad to hear that. Thank you for sharing.",
        AckBucket::Neutral => "Thank you for sharing that with me.",
    }
}

// =============================================================================
// VERBATIM
// =============================================================================

/// Rephraser that never calls a model.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerbatimRephraser;

#[async_trait]
impl Rephraser for VerbatimRephraser {
    async fn rephrase(&self, original_question: &str) -> Result<String, RephraseError> {
        Ok(original_question.to_string())
    }

    async fn acknowledge(&self, bucket: AckBucket) -> Result<String, RephraseError> {
        Ok(fallback_acknowledgment(bucket).to_string())
    }
}

// =============================================================================
// LLM OVER HTTP
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Rephraser backed by an OpenAI-compatible chat endpoint (Ollama, vLLM, ...).
#[derive(Debug, Clone)]
pub struct LlmRephraser {
    config: LlmConfig,
    client: reqwest::Client,
}

impl LlmRephraser {
    /// Build the HTTP client with timeout and optional bearer key.
    pub fn new(config: LlmConfig) -> Result<Self, RephraseError> {
        use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|e| RephraseError::Config(format!("Invalid API key header: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { config, client })
    }

    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, RephraseError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens,
        };

        let response = self
            .client
            .post(&self.config.url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RephraseError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| clean_completion(&text))
            .filter(|text| !text.is_empty())
            .ok_or(RephraseError::EmptyCompletion)
    }
}

/// Trim whitespace and one pair of wrapping quotes.
fn clean_completion(text: &str) -> String {
    let trimmed = text.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(trimmed);
    unquoted.trim().to_string()
}

#[async_trait]
impl Rephraser for LlmRephraser {
    async fn rephrase(&self, original_question: &str) -> Result<String, RephraseError> {
        self.complete(&rephrase_prompt(original_question), REPHRASE_MAX_TOKENS)
            .await
    }

    async fn acknowledge(&self, bucket: AckBucket) -> Result<String, RephraseError> {
        self.complete(acknowledgment_prompt(bucket), ACKNOWLEDGE_MAX_TOKENS)
            .await
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_embed_the_question() {
        let prompt = rephrase_prompt("Are you feeling tired?");
        assert!(prompt.ends_with(": Are you feeling tired?"));
        assert!(prompt.starts_with("Rephrase this question"));
    }

    #[test]
    fn acknowledgment_prompts_per_bucket() {
        assert!(acknowledgment_prompt(AckBucket::Negative).contains("empathetic"));
        assert!(acknowledgment_prompt(AckBucket::Positive).contains("positive"));
        assert!(acknowledgment_prompt(AckBucket::Neutral).contains("neutral"));
    }

    #[test]
    fn clean_completion_strips_quotes() {
        assert_eq!(clean_completion("  \"How have you slept?\"\n"), "How have you slept?");
        assert_eq!(clean_completion("plain"), "plain");
        assert_eq!(clean_completion("\"unbalanced"), "\"unbalanced");
    }

    #[tokio::test]
    async fn verbatim_returns_inputs() {
        let rephraser = VerbatimRephraser;
        let text = rephraser.rephrase("Question?").await;
        assert_eq!(text.ok().as_deref(), Some("Question?"));

        let ack = rephraser.acknowledge(AckBucket::Positive).await;
        assert_eq!(
            ack.ok().as_deref(),
            Some(fallback_acknowledgment(AckBucket::Positive))
        );
    }

    #[test]
    fn invalid_api_key_is_rejected() {
        let mut config = LlmConfig::new("http://localhost:11434/v1/chat/completions");
        config.api_key = Some("bad\nkey".to_string());
        assert!(matches!(
            LlmRephraser::new(config),
            Err(RephraseError::Config(_))
        ));
    }
}
