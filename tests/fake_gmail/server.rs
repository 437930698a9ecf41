//! In-process fake Gmail API
//!
//! Binds `127.0.0.1:0` and serves three endpoints:
//!
//! ```text
//!   POST /token                                  refresh-token grant
//!   GET  /gmail/v1/users/{user}/messages         ?maxResults=&q=
//!   GET  /gmail/v1/users/{user}/messages/{id}    ?format=&metadataHeaders=
//! ```
//!
//! Message endpoints require the bearer token handed out by `/token`.
//! Every request is counted, so tests can assert that no provider call
//! was made.

use super::mailbox::Mailbox;
use axum::extract::{Form, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const ACCESS_TOKEN: &str = "fake-access-token";

#[derive(Default)]
struct Shared {
    mailbox: Mailbox,
    requests: AtomicUsize,
    users: Mutex<Vec<String>>,
    user_agents: Mutex<Vec<String>>,
}

type AppState = Arc<Shared>;

/// A fake Gmail API on localhost with an OS-assigned port.
pub struct FakeGmailServer {
    port: u16,
    shared: AppState,
    /// Background accept loop, aborted on drop.
    handle: tokio::task::JoinHandle<()>,
}

#[allow(dead_code)]
impl FakeGmailServer {
    /// Start a fake API serving the given mailbox.
    pub async fn start(mailbox: Mailbox) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind to ephemeral port");
        let port = listener.local_addr().unwrap().port();

        let shared = Arc::new(Shared {
            mailbox,
            ..Shared::default()
        });

        let app = Router::new()
            .route("/token", post(token))
            .route("/gmail/v1/users/:user/messages", get(list_messages))
            .route("/gmail/v1/users/:user/messages/:id", get(get_message))
            .with_state(shared.clone());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            port,
            shared,
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Number of requests received on any endpoint.
    pub fn requests(&self) -> usize {
        self.shared.requests.load(Ordering::SeqCst)
    }

    /// Mailbox ids named in message requests, in arrival order.
    pub fn users(&self) -> Vec<String> {
        self.shared.users.lock().unwrap().clone()
    }

    /// `User-Agent` headers seen on message requests.
    pub fn user_agents(&self) -> Vec<String> {
        self.shared.user_agents.lock().unwrap().clone()
    }
}

impl Drop for FakeGmailServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn token(
    State(shared): State<AppState>,
    Form(form): Form<Vec<(String, String)>>,
) -> Response {
    shared.requests.fetch_add(1, Ordering::SeqCst);

    let field = |key: &str| {
        form.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };
    let grant_ok = field("grant_type") == Some("refresh_token")
        && field("refresh_token").is_some()
        && field("scope") == Some("https://www.googleapis.com/auth/gmail.readonly");

    if shared.mailbox.reject_token || !grant_ok {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant" })),
        )
            .into_response();
    }

    Json(json!({
        "access_token": ACCESS_TOKEN,
        "expires_in": 3599,
        "scope": "https://www.googleapis.com/auth/gmail.readonly",
        "token_type": "Bearer",
    }))
    .into_response()
}

/// Count the request and check its bearer token.
fn admit(shared: &Shared, headers: &HeaderMap, user: &str) -> Result<(), Response> {
    shared.requests.fetch_add(1, Ordering::SeqCst);
    shared.users.lock().unwrap().push(user.to_string());
    if let Some(agent) = headers.get("user-agent").and_then(|v| v.to_str().ok()) {
        shared.user_agents.lock().unwrap().push(agent.to_string());
    }

    let expected = format!("Bearer {ACCESS_TOKEN}");
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);
    if authorized {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, Json(json!({ "error": { "code": 401 } }))).into_response())
    }
}

fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

async fn list_messages(
    State(shared): State<AppState>,
    Path(user): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = admit(&shared, &headers, &user) {
        return denied;
    }

    let limit = param(&params, "maxResults")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(100);
    let query = param(&params, "q");

    let refs: Vec<_> = shared
        .mailbox
        .messages
        .iter()
        .filter(|m| query.is_none_or(|q| m.matches(q)))
        .take(limit)
        .map(|m| json!({ "id": m.id, "threadId": m.thread_id }))
        .collect();

    // The real API omits `messages` entirely when nothing matches.
    if refs.is_empty() {
        return Json(json!({ "resultSizeEstimate": 0 })).into_response();
    }
    Json(json!({ "messages": refs, "resultSizeEstimate": refs.len() })).into_response()
}

async fn get_message(
    State(shared): State<AppState>,
    Path((user, id)): Path<(String, String)>,
    Query(params): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = admit(&shared, &headers, &user) {
        return denied;
    }

    if shared.mailbox.invalid.contains(&id) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": { "code": 400, "message": "Invalid id value" } })),
        )
            .into_response();
    }
    if shared.mailbox.forbidden.contains(&id) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": { "code": 403, "message": "Delegation denied" } })),
        )
            .into_response();
    }
    if shared.mailbox.failing.contains(&id) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": { "code": 500, "message": "Backend Error" } })),
        )
            .into_response();
    }

    let Some(message) = shared.mailbox.get(&id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": { "code": 404, "message": "Requested entity was not found." } })),
        )
            .into_response();
    };

    let wanted: Vec<String> = params
        .iter()
        .filter(|(k, _)| k == "metadataHeaders")
        .map(|(_, v)| v.clone())
        .collect();
    let only_headers = (param(&params, "format") == Some("metadata")).then_some(wanted.as_slice());

    Json(message.to_json(only_headers)).into_response()
}
