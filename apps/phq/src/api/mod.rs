//! # HTTP API
//!
//! axum router for the questionnaire.
//!
//! | Method | Path        | Body                  | Reply                              |
//! |--------|-------------|-----------------------|------------------------------------|
//! | GET    | `/`         |                       | HTML page                          |
//! | GET    | `/health`   |                       | `{status, version, active_sessions}` |
//! | GET    | `/question` |                       | `{message, is_summary, ...}`       |
//! | POST   | `/response` | `{response}`          | `{acknowledgment, suggested_ranking}` |
//! | POST   | `/ranking`  | `{ranking}`           | `{status}`                         |
//!
//! Sessions are identified by the `phq_session` cookie, issued by
//! `GET /question` when the request lacks one.
//!
//! Questionnaire routes are rate limited per session cookie. Requests without
//! a cookie (first visits) share one bucket.

mod error;
mod handlers;
mod session;
mod types;

pub use error::ApiError;
pub use session::{SESSION_COOKIE, session_cookie};
pub use types::*;

use crate::config::ServerConfig;
use crate::rephraser::{LlmRephraser, RephraseError, Rephraser, VerbatimRephraser};
use crate::scorer::SessionScorer;
use axum::Router;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use phq_core::{LexiconAnalyzer, SessionId};
use std::num::NonZeroU32;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rephraser setup failed: {0}")]
    Rephraser(#[from] RephraseError),
}

/// Limiter keys kept before idle buckets are swept.
const LIMITER_SWEEP_THRESHOLD: usize = 10_000;

/// Rate limiter keyed by session; `None` is the shared cookieless bucket.
type SessionLimiter = DefaultKeyedRateLimiter<Option<SessionId>>;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub scorer: Arc<SessionScorer>,
    limiter: Option<Arc<SessionLimiter>>,
}

impl AppState {
    pub fn new(scorer: Arc<SessionScorer>) -> Self {
        Self {
            scorer,
            limiter: None,
        }
    }

    /// Limit each session to `per_second` questionnaire requests; 0 disables.
    #[must_use]
    pub fn with_rate_limit(mut self, per_second: u32) -> Self {
        self.limiter = NonZeroU32::new(per_second)
            .map(|rate| Arc::new(RateLimiter::keyed(Quota::per_second(rate))));
        self
    }

    /// Wire the scorer from configuration.
    pub fn from_config(config: &ServerConfig) -> Result<Self, ServeError> {
        let rephraser: Arc<dyn Rephraser> = match &config.llm {
            Some(llm) => {
                info!(url = %llm.url, model = %llm.model, "Rephrasing through language model");
                Arc::new(LlmRephraser::new(llm.clone())?)
            }
            None => {
                info!("No language model configured, serving questions verbatim");
                Arc::new(VerbatimRephraser)
            }
        };

        let scorer = SessionScorer::new(
            rephraser,
            Arc::new(LexiconAnalyzer::new()),
            config.max_sessions,
        );
        Ok(Self::new(Arc::new(scorer)).with_rate_limit(config.rate_limit))
    }
}

async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if let Some(limiter) = &state.limiter {
        if limiter.len() > LIMITER_SWEEP_THRESHOLD {
            limiter.retain_recent();
        }
        let key = session_cookie(request.headers());
        if limiter.check_key(&key).is_err() {
            return ApiError::RateLimited.into_response();
        }
    }
    next.run(request).await
}

/// Build the router with session cookies, rate limiting and tracing.
pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    let questionnaire = Router::new()
        .route(
            "/question",
            get(handlers::get_question).layer(middleware::from_fn(session::ensure_session)),
        )
        .route("/response", post(handlers::post_response))
        .route("/ranking", post(handlers::post_ranking))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit));

    let mut router = Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .merge(questionnaire)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let origins: Vec<HeaderValue> = cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if !origins.is_empty() {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE])
                .allow_credentials(true),
        );
    }

    router
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<(), ServeError> {
    let state = AppState::from_config(&config)?;
    let router = create_router(state, &config.cors_origins);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, "PHQ-9 server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
