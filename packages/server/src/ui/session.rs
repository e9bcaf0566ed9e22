//! Session cookie handling.
//!
//! Every browser-like client is identified by an opaque id stored in the
//! `SESSION` cookie. The middleware issues a fresh id when the request carries
//! none, and exposes the id to handlers as a [`ChatSession`] extension.
//!
//! Cookie format: `SESSION=<id>; Path=/; HttpOnly; SameSite=Lax`

use axum::{
    extract::{Request, State},
    http::{
        HeaderValue,
        header::{COOKIE, InvalidHeaderValue, SET_COOKIE},
    },
    middleware::Next,
    response::Response,
};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::ParticipantId;

/// Cookie name for the chat session id.
pub const SESSION_COOKIE_NAME: &str = "SESSION";

/// Session id attached to the request by [`session_middleware`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSession(pub String);

impl ChatSession {
    /// Convert into the participant id used by the chat core.
    pub fn participant_id(self) -> Result<ParticipantId, SessionError> {
        ParticipantId::new(self.0).map_err(|_| SessionError::Missing)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SessionPolicy {
    /// Issue a new session id when the request has none.
    pub issue_sessions: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("No session")]
    Missing,
}

/// Generate a new session id (UUID v4, simple form).
pub fn generate_session_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Build the `Set-Cookie` header value for the session id.
pub fn build_session_cookie(session_id: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE_NAME, session_id
    );
    HeaderValue::from_str(&cookie)
}

/// Extract the session id from a `Cookie` header value.
pub fn extract_session_id(cookie_header: &str) -> Option<String> {
    let prefix = format!("{}=", SESSION_COOKIE_NAME);
    for part in cookie_header.split(';') {
        if let Some(value) = part.trim().strip_prefix(&prefix) {
            let id = value.trim();
            if !id.is_empty() {
                return Some(id.to_string());
            }
        }
    }
    None
}

/// Middleware that attaches (and, if allowed, issues) the chat session.
pub async fn session_middleware(
    State(policy): State<SessionPolicy>,
    mut req: Request,
    next: Next,
) -> Response {
    let existing = req
        .headers()
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(extract_session_id);

    if let Some(session_id) = existing {
        req.extensions_mut().insert(ChatSession(session_id));
        return next.run(req).await;
    }

    if !policy.issue_sessions {
        return next.run(req).await;
    }

    let session_id = generate_session_id();
    let cookie = match build_session_cookie(&session_id) {
        Ok(cookie) => cookie,
        Err(e) => {
            tracing::error!("Failed to build session cookie: {}", e);
            return next.run(req).await;
        }
    };
    tracing::debug!("Issued new session for {} {}", req.method(), req.uri().path());
    req.extensions_mut().insert(ChatSession(session_id));

    let mut response = next.run(req).await;
    response.headers_mut().append(SET_COOKIE, cookie);
    response
}
