//! Read-only Gmail client

use crate::config::GmailConfig;
use crate::connection::{GmailSession, connect};
use crate::error::{Error, Result};
use crate::format::MessageFormat;
use crate::message::{EmailSummary, Message, MessageList};
use tracing::{info, warn};

/// Headers requested when only a summary is needed.
const METADATA_HEADERS: [&str; 3] = ["Subject", "From", "Date"];

/// Read-only Gmail client
///
/// Every operation opens its own authenticated session, so a
/// `GmailClient` holds only configuration and is cheap to share.
#[derive(Debug, Clone)]
pub struct GmailClient {
    config: GmailConfig,
}

impl GmailClient {
    #[must_use]
    pub const fn new(config: GmailConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &GmailConfig {
        &self.config
    }

    /// List up to `limit` recent messages, optionally filtered by a
    /// Gmail search query.
    ///
    /// Messages whose metadata cannot be fetched are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication or the list call fails.
    pub async fn list_recent(
        &self,
        user_id: &str,
        limit: u32,
        query: Option<&str>,
    ) -> Result<Vec<EmailSummary>> {
        if limit == 0 {
            return Ok(vec![]);
        }

        let session = connect(&self.config).await?;

        let mut params = vec![("maxResults", limit.to_string())];
        if let Some(q) = query {
            params.push(("q", q.to_string()));
        }

        let url = session.messages_url(user_id, None)?;
        let list: MessageList = session.get_json(url, &params).await?;

        let refs = list.messages.into_iter().take(limit as usize);
        let mut emails = Vec::new();
        for message_ref in refs {
            match self
                .fetch_message(&session, user_id, &message_ref.id, MessageFormat::Metadata)
                .await
            {
                Ok(message) => emails.push(EmailSummary::from(&message)),
                Err(e) => warn!("Failed to fetch message {}: {}", message_ref.id, e),
            }
        }

        info!("Listed {} messages for {}", emails.len(), user_id);
        Ok(emails)
    }

    /// Fetch a single message by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the provider has no such
    /// message, or another error if authentication or the call fails.
    pub async fn get_by_id(&self, user_id: &str, message_id: &str) -> Result<EmailSummary> {
        self.get_message(user_id, message_id, MessageFormat::Full)
            .await
    }

    /// Fetch a single message by id in the given format.
    ///
    /// # Errors
    ///
    /// Same as [`GmailClient::get_by_id`].
    pub async fn get_message(
        &self,
        user_id: &str,
        message_id: &str,
        format: MessageFormat,
    ) -> Result<EmailSummary> {
        let session = connect(&self.config).await?;

        let message = match self
            .fetch_message(&session, user_id, message_id, format)
            .await
        {
            // An id the API cannot even parse names no message.
            Err(Error::Api { status: 400, .. }) => {
                return Err(Error::NotFound(format!(
                    "Email with id {message_id} not found"
                )));
            }
            other => other?,
        };

        Ok(EmailSummary::from(&message))
    }

    /// Search messages with a Gmail query. Identical to
    /// [`GmailClient::list_recent`] with the query supplied.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication or the list call fails.
    pub async fn search(
        &self,
        user_id: &str,
        limit: u32,
        query: Option<&str>,
    ) -> Result<Vec<EmailSummary>> {
        self.list_recent(user_id, limit, query).await
    }

    // -- private helpers --

    #[allow(clippy::unused_self)]
    async fn fetch_message(
        &self,
        session: &GmailSession,
        user_id: &str,
        message_id: &str,
        format: MessageFormat,
    ) -> Result<Message> {
        let url = session.messages_url(user_id, Some(message_id))?;

        let mut params = vec![("format", format.as_str())];
        if format == MessageFormat::Metadata {
            params.extend(METADATA_HEADERS.iter().map(|h| ("metadataHeaders", *h)));
        }

        session.get_json(url, &params).await
    }
}
