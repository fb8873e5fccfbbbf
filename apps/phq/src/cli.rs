//! Command-line interface.
//!
//! Every `cmd_*` function returns the text it would print so it can be tested
//! without capturing stdout; `main` does the printing.

use crate::api;
use crate::config::{
    DEFAULT_HOST, DEFAULT_LLM_MODEL, DEFAULT_LLM_TIMEOUT_SECS, DEFAULT_PORT, DEFAULT_RATE_LIMIT,
    LlmConfig, ServerConfig,
};
use clap::{Args, Parser, Subcommand};
use phq_core::store::DEFAULT_MAX_SESSIONS;
use phq_core::{
    LexiconAnalyzer, QUESTION_COUNT, QUESTIONS, Ranking, ScoringError, Summary, TextAnalyzer,
    infer_frequency,
};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Expected {expected} rankings, got {got}")]
    RankingCount { expected: usize, got: usize },

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Serve(#[from] api::ServeError),
}

// =============================================================================
// ARGUMENTS
// =============================================================================

#[derive(Debug, Parser)]
#[command(name = "phq", version, about = "PHQ-9 depression screening server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Print the nine PHQ-9 questions
    Questions {
        #[arg(long)]
        json: bool,
    },

    /// Score nine rankings (0-3) without running the server
    Score {
        #[arg(required = true, allow_negative_numbers = true)]
        rankings: Vec<i64>,
        #[arg(long)]
        json: bool,
    },

    /// Show polarity, keywords and suggested ranking for an answer
    Analyze {
        text: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    #[arg(long, env = "PHQ_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(short, long, env = "PHQ_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// OpenAI-compatible chat/completions URL; omit to serve questions verbatim
    #[arg(long, env = "PHQ_LLM_URL")]
    pub llm_url: Option<String>,

    #[arg(long, env = "PHQ_LLM_MODEL", default_value = DEFAULT_LLM_MODEL)]
    pub llm_model: String,

    #[arg(long, env = "PHQ_LLM_API_KEY", hide_env_values = true)]
    pub llm_api_key: Option<String>,

    #[arg(long, env = "PHQ_LLM_TIMEOUT_SECS", default_value_t = DEFAULT_LLM_TIMEOUT_SECS)]
    pub llm_timeout_secs: u64,

    #[arg(long, env = "PHQ_MAX_SESSIONS", default_value_t = DEFAULT_MAX_SESSIONS)]
    pub max_sessions: usize,

    /// Requests per second on questionnaire routes (0 disables)
    #[arg(long, env = "PHQ_RATE_LIMIT", default_value_t = DEFAULT_RATE_LIMIT)]
    pub rate_limit: u32,

    #[arg(long = "cors-origin", env = "PHQ_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,
}

impl ServeArgs {
    pub fn into_config(self) -> ServerConfig {
        let llm = self.llm_url.map(|url| LlmConfig {
            url,
            model: self.llm_model,
            api_key: self.llm_api_key.filter(|key| !key.is_empty()),
            timeout: Duration::from_secs(self.llm_timeout_secs),
        });

        ServerConfig {
            host: self.host,
            port: self.port,
            llm,
            max_sessions: self.max_sessions,
            rate_limit: self.rate_limit,
            cors_origins: self.cors_origins,
        }
    }
}

// =============================================================================
// COMMANDS
// =============================================================================

pub async fn cmd_serve(args: ServeArgs) -> Result<(), CliError> {
    api::serve(args.into_config()).await?;
    Ok(())
}

pub fn cmd_questions(json: bool) -> Result<String, CliError> {
    if json {
        return Ok(serde_json::to_string_pretty(&QUESTIONS)?);
    }

    let lines: Vec<String> = QUESTIONS
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. {}", i + 1, q))
        .collect();
    Ok(lines.join("\n"))
}

pub fn cmd_score(values: &[i64], json: bool) -> Result<String, CliError> {
    if values.len() != QUESTION_COUNT {
        return Err(CliError::RankingCount {
            expected: QUESTION_COUNT,
            got: values.len(),
        });
    }

    let rankings = values
        .iter()
        .map(|v| Ranking::new(*v))
        .collect::<Result<Vec<_>, _>>()?;
    let summary = Summary::compute(&rankings, &[], &[]);

    if json {
        return Ok(serde_json::to_string_pretty(&json!({
            "total_score": summary.total_score,
            "severity": summary.severity.label(),
            "guidance": summary.severity.guidance(),
        }))?);
    }

    Ok(format!(
        "Total score: {}\nSeverity:    {}\n{}",
        summary.total_score,
        summary.severity,
        summary.severity.guidance()
    ))
}

pub fn cmd_analyze(text: &str, json: bool) -> Result<String, CliError> {
    let analysis = LexiconAnalyzer::new().analyze(text);
    let bucket = analysis.polarity.bucket();
    let suggested = infer_frequency(text);

    if json {
        return Ok(serde_json::to_string_pretty(&json!({
            "polarity": analysis.polarity.to_string(),
            "polarity_thousandths": analysis.polarity.thousandths(),
            "bucket": bucket.as_str(),
            "keyword_count": analysis.keyword_count,
            "suggested_ranking": suggested.map(|f| f.score()),
        }))?);
    }

    let suggestion = suggested
        .map(|f| format!("{} ({})", f.score(), f.label()))
        .unwrap_or_else(|| "none".to_string());
    Ok(format!(
        "Polarity:  {} ({})\nKeywords:  {}\nSuggested: {}",
        analysis.polarity,
        bucket.as_str(),
        analysis.keyword_count,
        suggestion
    ))
}
