//! HTTP surface of the gateway
//!
//! ```text
//! GET  /api/gmail/emails?maxResults=&query=&userId=
//! GET  /api/gmail/emails/{messageId}?userId=
//! POST /api/gmail/emails/search?userId=        {maxResults?, query?}
//! GET  /api/gmail/health
//! ```

use crate::client::GmailClient;
use crate::config::GmailConfig;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

pub mod emails;
pub mod health;

/// Mailbox used when a request names none.
pub const DEFAULT_USER_ID: &str = "me";

/// Shared handler state.
///
/// `gmail` is `None` when the gateway started without credentials;
/// every mail endpoint then answers 503.
#[derive(Clone, Default)]
pub struct AppState {
    gmail: Option<Arc<GmailClient>>,
}

impl AppState {
    #[must_use]
    pub fn new(config: Option<GmailConfig>) -> Self {
        if config.is_none() {
            warn!("Gmail credentials not configured. Gmail endpoints will return 503.");
        }
        Self {
            gmail: config.map(|c| Arc::new(GmailClient::new(c))),
        }
    }

    /// State with no Gmail access.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self::new(None)
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.gmail.is_some()
    }

    fn gmail(&self) -> Result<&GmailClient, ApiError> {
        self.gmail.as_deref().ok_or(ApiError::NotConfigured)
    }
}

/// Build the gateway router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/gmail/emails", get(emails::list_emails))
        .route("/api/gmail/emails/", get(emails::missing_message_id))
        .route("/api/gmail/emails/search", post(emails::search_emails))
        .route("/api/gmail/emails/:message_id", get(emails::get_email))
        .route("/api/gmail/health", get(health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handler failures, each with a fixed status and body.
#[derive(Debug)]
pub enum ApiError {
    NotConfigured,
    Unavailable,
    NotFound,
    BadRequest(String),
    Internal(&'static str),
}

impl ApiError {
    /// Classify a client error, logging anything that is not a plain
    /// miss. `failure` is the body text for unexpected errors.
    pub(crate) fn from_gmail(err: crate::Error, failure: &'static str) -> Self {
        match err {
            crate::Error::NotFound(_) => Self::NotFound,
            crate::Error::Auth(msg) => {
                tracing::error!("Gmail authentication failed: {msg}");
                Self::Unavailable
            }
            other => {
                tracing::error!("{failure}: {other}");
                Self::Internal(failure)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotConfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Gmail service not configured".to_string(),
            ),
            Self::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Gmail service unavailable".to_string(),
            ),
            Self::NotFound => (StatusCode::NOT_FOUND, "Email not found".to_string()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.to_string()),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
