//! Route handlers.

use super::session::CurrentSession;
use super::types::{
    AcknowledgmentResponse, HealthResponse, QuestionResponse, RankingRequest, ResponseRequest,
    StatusResponse,
};
use super::{ApiError, AppState};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let stats = state.scorer.stats().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active_sessions: stats.active,
    })
}

/// GET /question
pub async fn get_question(
    State(state): State<AppState>,
    CurrentSession(id): CurrentSession,
) -> Json<QuestionResponse> {
    let prompt = state.scorer.get_next_prompt(&id).await;
    Json(QuestionResponse::from(prompt))
}

/// POST /response
pub async fn post_response(
    State(state): State<AppState>,
    CurrentSession(id): CurrentSession,
    payload: Result<Json<ResponseRequest>, JsonRejection>,
) -> Result<Json<AcknowledgmentResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let ack = state.scorer.record_response(&id, &request.response).await?;
    Ok(Json(AcknowledgmentResponse::from(ack)))
}

/// POST /ranking
pub async fn post_ranking(
    State(state): State<AppState>,
    CurrentSession(id): CurrentSession,
    payload: Result<Json<RankingRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let value = request
        .ranking
        .as_integer()
        .ok_or_else(|| ApiError::BadRequest("ranking must be an integer".to_string()))?;

    state.scorer.record_ranking(&id, value).await?;
    Ok(Json(StatusResponse {
        status: "success".to_string(),
    }))
}
