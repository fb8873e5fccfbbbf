//! Cookie-backed session identity.
//!
//! Only `GET /question` starts sessions: [`ensure_session`] mints a fresh id
//! when the client sent no (valid) `phq_session` cookie and returns it with
//! `Set-Cookie`. The other routes read the cookie and never issue one.

use super::ApiError;
use phq_core::ScoringError;
use axum::extract::{FromRequestParts, Request};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use phq_core::SessionId;
use tracing::{debug, warn};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "phq_session";

/// Session id from the request's `Cookie` headers, if well formed.
pub fn session_cookie(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| SessionId::parse(value.trim()))
}

fn new_session_id() -> Option<SessionId> {
    SessionId::parse(&uuid::Uuid::new_v4().to_string())
}

fn set_cookie_value(id: &SessionId) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, id
    ))
    .ok()
}

/// Extractor for the caller's session: the id attached by [`ensure_session`],
/// else the request cookie. Without either the session is missing.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub SessionId);

impl<S: Send + Sync> FromRequestParts<S> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionId>()
            .cloned()
            .or_else(|| session_cookie(&parts.headers))
            .map(CurrentSession)
            .ok_or(ApiError::Scoring(ScoringError::MissingSession))
    }
}

/// Middleware for `GET /question`: attach the caller's session id, issuing
/// one if needed.
pub async fn ensure_session(mut request: Request, next: Next) -> Response {
    let (id, issued) = match session_cookie(request.headers()) {
        Some(id) => (id, false),
        None => match new_session_id() {
            Some(id) => {
                debug!(session = %id, "Issuing session cookie");
                (id, true)
            }
            None => {
                warn!("Generated session id failed validation");
                return next.run(request).await;
            }
        },
    };

    request.extensions_mut().insert(id.clone());
    let mut response = next.run(request).await;

    if issued {
        if let Some(cookie) = set_cookie_value(&id) {
            response.headers_mut().append(SET_COOKIE, cookie);
        }
    }
    response
}
