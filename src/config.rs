//! Gateway configuration

use crate::error::{Error, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default Gmail REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://gmail.googleapis.com";

/// Default application name, sent as the `User-Agent` of provider calls.
pub const DEFAULT_APPLICATION_NAME: &str = "gmail-gateway";

/// Gmail access configuration
#[derive(Debug, Clone)]
pub struct GmailConfig {
    pub credentials_path: PathBuf,
    pub application_name: String,
    pub api_base: String,
}

impl GmailConfig {
    /// Configuration pointing at the public Gmail API.
    #[must_use]
    pub fn new(credentials_path: impl Into<PathBuf>) -> Self {
        Self {
            credentials_path: credentials_path.into(),
            application_name: DEFAULT_APPLICATION_NAME.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Load Gmail configuration from environment variables
    ///
    /// Reads from `.env` file if present. Returns `Ok(None)` when
    /// `GMAIL_CREDENTIALS_PATH` is unset: the gateway then runs
    /// unconfigured instead of refusing to start.
    ///
    /// Optional (with defaults):
    /// - `GMAIL_APPLICATION_NAME` (default: `gmail-gateway`)
    /// - `GMAIL_API_BASE` (default: `https://gmail.googleapis.com`)
    pub fn from_env() -> Result<Option<Self>> {
        dotenvy::dotenv().ok();

        let Some(credentials_path) = non_empty_var("GMAIL_CREDENTIALS_PATH") else {
            return Ok(None);
        };

        let api_base = non_empty_var("GMAIL_API_BASE")
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        if !api_base.starts_with("http://") && !api_base.starts_with("https://") {
            return Err(Error::Config(format!("Invalid GMAIL_API_BASE: {api_base}")));
        }

        Ok(Some(Self {
            credentials_path: PathBuf::from(credentials_path),
            application_name: non_empty_var("GMAIL_APPLICATION_NAME")
                .unwrap_or_else(|| DEFAULT_APPLICATION_NAME.to_string()),
            api_base: api_base.trim_end_matches('/').to_string(),
        }))
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Load listener configuration from environment variables
    ///
    /// Optional (with defaults):
    /// - `HOST` (default: `0.0.0.0`)
    /// - `PORT` (default: `8080`)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_port(&env::var("PORT").unwrap_or_else(|_| "8080".to_string()))?,
        })
    }

    /// The socket address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("Invalid listen address: {e}")))
    }
}

fn parse_port(raw: &str) -> Result<u16> {
    raw.trim()
        .parse()
        .map_err(|e| Error::Config(format!("Invalid PORT: {e}")))
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
