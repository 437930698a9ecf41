//! Authenticated Gmail API sessions
//!
//! Provides the low-level `connect()` used by every `GmailClient`
//! operation. A session is built per call and dropped afterwards:
//! there is no token cache and no connection pool.

use crate::config::GmailConfig;
use crate::credentials::Credentials;
use crate::error::{Error, Result};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// An HTTP client paired with a freshly minted access token.
pub struct GmailSession {
    http: reqwest::Client,
    api_base: String,
    access_token: String,
}

/// Open a fresh authenticated session.
///
/// Reads the credentials file at `config.credentials_path`, exchanges
/// its refresh token for a read-only access token, and returns a
/// client tagged with the configured application name.
///
/// # Errors
///
/// Every failure on this path is reported as [`Error::Auth`].
pub async fn connect(config: &GmailConfig) -> Result<GmailSession> {
    let credentials = Credentials::from_file(&config.credentials_path).await?;

    let http = reqwest::Client::builder()
        .user_agent(config.application_name.as_str())
        .build()
        .map_err(|e| Error::Auth(format!("HTTP client setup failed: {e}")))?;

    let access_token = credentials.access_token(&http).await?;

    info!("Authenticated against Gmail API");
    Ok(GmailSession {
        http,
        api_base: config.api_base.clone(),
        access_token,
    })
}

impl GmailSession {
    /// URL of `users/{user_id}/messages[/{extra}]`, with every path
    /// segment percent-encoded.
    pub(crate) fn messages_url(&self, user_id: &str, message_id: Option<&str>) -> Result<Url> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| Error::Config(format!("Invalid API base {}: {e}", self.api_base)))?;
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                Error::Config(format!("API base cannot hold a path: {}", self.api_base))
            })?;
            segments
                .pop_if_empty()
                .extend(["gmail", "v1", "users", user_id, "messages"]);
            if let Some(id) = message_id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    /// Authenticated GET returning a decoded JSON body.
    pub(crate) async fn get_json<T, Q>(&self, url: Url, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        debug!("GET {}", url.path());

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))
    }
}

/// Map a failed API call. `Auth` is reserved for `connect()`.
fn status_error(status: StatusCode, body: String) -> Error {
    match status {
        StatusCode::NOT_FOUND => Error::NotFound(body),
        _ => Error::Api {
            status: status.as_u16(),
            message: body,
        },
    }
}
