//! Server configuration.
//!
//! Values come from the `serve` subcommand (flags or `PHQ_*` environment
//! variables) and are passed by value into the router builder.

use std::time::Duration;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_LLM_MODEL: &str = "llama3.2";
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RATE_LIMIT: u32 = 20;
pub const DEFAULT_LOG_FILTER: &str = "phq=info,tower_http=info";

/// Language model endpoint used for rephrasing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    /// Full URL of an OpenAI-compatible `chat/completions` endpoint.
    pub url: String,
    pub model: String,
    /// Sent as `Authorization: Bearer <key>` when present.
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl LlmConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            model: DEFAULT_LLM_MODEL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
        }
    }
}

/// Everything the HTTP server needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `None` serves the questions verbatim.
    pub llm: Option<LlmConfig>,
    pub max_sessions: usize,
    /// Requests per second across the questionnaire routes; 0 disables.
    pub rate_limit: u32,
    /// Allowed CORS origins; empty means same-origin only.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            llm: None,
            max_sessions: phq_core::store::DEFAULT_MAX_SESSIONS,
            rate_limit: DEFAULT_RATE_LIMIT,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
