//! Stored OAuth credentials and access-token exchange
//!
//! The credentials artifact is Google's `authorized_user` JSON: an
//! OAuth client id/secret plus a long-lived refresh token. Each
//! exchange trades the refresh token for a short-lived access token
//! restricted to the read-only Gmail scope.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// OAuth scope requested for every token: read-only mailbox access.
pub const GMAIL_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/gmail.readonly";

/// Google's token endpoint, used when the credentials omit `token_uri`.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

const AUTHORIZED_USER: &str = "authorized_user";

/// Parsed contents of an `authorized_user` credentials file.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    #[serde(rename = "type")]
    pub kind: String,
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("kind", &self.kind)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl Credentials {
    /// Read and parse a credentials file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] if the file cannot be read, is not
    /// valid JSON, or holds a credential kind other than
    /// `authorized_user`.
    pub async fn from_file(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read(path).await.map_err(|e| {
            Error::Auth(format!(
                "Cannot read credentials {}: {e}",
                path.display()
            ))
        })?;
        Self::from_slice(&raw)
    }

    /// Parse credentials from raw JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] on malformed JSON or an unsupported
    /// credential kind.
    pub fn from_slice(raw: &[u8]) -> Result<Self> {
        let creds: Self = serde_json::from_slice(raw)
            .map_err(|e| Error::Auth(format!("Invalid credentials: {e}")))?;

        if creds.kind != AUTHORIZED_USER {
            return Err(Error::Auth(format!(
                "Unsupported credentials type: {}",
                creds.kind
            )));
        }
        Ok(creds)
    }

    /// The token endpoint these credentials are exchanged at.
    #[must_use]
    pub fn token_uri(&self) -> &str {
        self.token_uri.as_deref().unwrap_or(GOOGLE_TOKEN_URL)
    }

    /// Exchange the refresh token for a read-only access token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] if the token endpoint is unreachable,
    /// rejects the grant, or answers with an unexpected body.
    pub async fn access_token(&self, http: &reqwest::Client) -> Result<String> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", self.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
            ("scope", GMAIL_READONLY_SCOPE),
        ];

        debug!("Exchanging refresh token at {}", self.token_uri());

        let response = http
            .post(self.token_uri())
            .form(&params)
            .send()
            .await
            .map_err(|e| Error::Auth(format!("Token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Auth(format!(
                "Token refresh failed ({status}): {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::Auth(format!("Invalid token response: {e}")))?;
        Ok(token.access_token)
    }
}
