//! List, fetch and search handlers

use super::{ApiError, AppState, DEFAULT_USER_ID};
use crate::message::{EmailList, EmailSummary};
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use serde::Deserialize;

pub const DEFAULT_MAX_RESULTS: u32 = 10;
pub const MAX_SEARCH_RESULTS: i64 = 100;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// Kept as text: a value that is not a count falls back to the default.
    pub max_results: Option<String>,
    pub query: Option<String>,
    pub user_id: Option<String>,
}

impl ListParams {
    fn max_results(&self) -> u32 {
        self.max_results
            .as_deref()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_RESULTS)
    }

    fn query(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserParams {
    pub user_id: Option<String>,
}

fn user_id(param: Option<&String>) -> &str {
    param.map_or(DEFAULT_USER_ID, String::as_str)
}

/// Body of `POST /api/gmail/emails/search`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default = "default_max_results")]
    pub max_results: i64,
    #[serde(default)]
    pub query: Option<String>,
}

fn default_max_results() -> i64 {
    i64::from(DEFAULT_MAX_RESULTS)
}

impl SearchRequest {
    /// The requested result count, if it lies in `1..=100`.
    ///
    /// # Errors
    ///
    /// Returns the message explaining which bound was violated.
    pub fn validate(&self) -> Result<u32, &'static str> {
        if self.max_results <= 0 {
            return Err("maxResults must be greater than 0");
        }
        if self.max_results > MAX_SEARCH_RESULTS {
            return Err("maxResults cannot exceed 100");
        }
        u32::try_from(self.max_results).map_err(|_| "maxResults cannot exceed 100")
    }
}

pub async fn list_emails(
    State(state): State<AppState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<EmailList>, ApiError> {
    let gmail = state.gmail()?;
    let Query(params) = query.map_err(bad_query)?;

    let emails = gmail
        .list_recent(
            user_id(params.user_id.as_ref()),
            params.max_results(),
            params.query(),
        )
        .await
        .map_err(|e| ApiError::from_gmail(e, "Failed to fetch emails"))?;

    Ok(Json(EmailList::from(emails)))
}

pub async fn get_email(
    State(state): State<AppState>,
    Path(message_id): Path<String>,
    query: Result<Query<UserParams>, QueryRejection>,
) -> Result<Json<EmailSummary>, ApiError> {
    let gmail = state.gmail()?;
    let Query(params) = query.map_err(bad_query)?;

    let message_id = message_id.trim();
    if message_id.is_empty() {
        return Err(missing_id());
    }

    let email = gmail
        .get_by_id(user_id(params.user_id.as_ref()), message_id)
        .await
        .map_err(|e| ApiError::from_gmail(e, "Failed to fetch email"))?;

    Ok(Json(email))
}

/// `GET /api/gmail/emails/` with the id segment left empty.
pub async fn missing_message_id(State(state): State<AppState>) -> ApiError {
    match state.gmail() {
        Ok(_) => missing_id(),
        Err(e) => e,
    }
}

pub async fn search_emails(
    State(state): State<AppState>,
    query: Result<Query<UserParams>, QueryRejection>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<EmailList>, ApiError> {
    let gmail = state.gmail()?;
    let Query(params) = query.map_err(bad_query)?;

    let Json(request) = body.map_err(|e| {
        tracing::debug!("Rejected search body: {e}");
        ApiError::BadRequest("Invalid request body".to_string())
    })?;
    let limit = request
        .validate()
        .map_err(|msg| ApiError::BadRequest(msg.to_string()))?;

    let emails = gmail
        .search(
            user_id(params.user_id.as_ref()),
            limit,
            request.query.as_deref(),
        )
        .await
        .map_err(|e| ApiError::from_gmail(e, "Failed to search emails"))?;

    Ok(Json(EmailList::from(emails)))
}

#[allow(clippy::needless_pass_by_value)]
fn bad_query(rejection: QueryRejection) -> ApiError {
    tracing::debug!("Rejected query string: {rejection}");
    ApiError::BadRequest("Invalid query parameters".to_string())
}

fn missing_id() -> ApiError {
    ApiError::BadRequest("messageId is required".to_string())
}
