//! API error type and its HTTP mapping.

use super::types::ErrorResponse;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use phq_core::ScoringError;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Too many requests")]
    RateLimited,
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Scoring(ScoringError::InvalidRanking(_)) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Scoring(ScoringError::MissingSession | ScoringError::OutOfSequence(_)) => {
                StatusCode::CONFLICT
            }
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// Stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Scoring(ScoringError::InvalidRanking(_)) => "invalid_ranking",
            Self::Scoring(ScoringError::MissingSession) => "missing_session",
            Self::Scoring(ScoringError::OutOfSequence(_)) => "out_of_sequence",
            Self::BadRequest(_) => "bad_request",
            Self::RateLimited => "rate_limited",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        debug!(code = self.code(), error = %self, "Request rejected");
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phq_core::SequenceViolation;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ApiError::from(ScoringError::InvalidRanking(9)).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ScoringError::MissingSession).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(ScoringError::OutOfSequence(
                SequenceViolation::RankingWithoutResponse
            ))
            .code(),
            "out_of_sequence"
        );
        assert_eq!(ApiError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
