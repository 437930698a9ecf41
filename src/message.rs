//! Gmail message payloads and the normalized [`EmailSummary`]

use serde::{Deserialize, Serialize};

pub const NO_SUBJECT: &str = "(No Subject)";
pub const UNKNOWN_SENDER: &str = "(Unknown Sender)";

/// Response of `users.messages.list`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageList {
    #[serde(default)]
    pub messages: Vec<MessageRef>,
}

/// A lightweight handle to a message, as returned by a list call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    pub id: String,
}

/// A message as returned by `users.messages.get`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub thread_id: String,
    #[serde(default)]
    pub snippet: Option<String>,
    /// Epoch milliseconds, encoded by the API as a decimal string.
    #[serde(default)]
    pub internal_date: Option<String>,
    #[serde(default)]
    pub payload: Option<Payload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Payload {
    #[serde(default)]
    pub headers: Vec<Header>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Message {
    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.payload
            .as_ref()?
            .headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Receive time in epoch milliseconds, if the provider supplied one.
    #[must_use]
    pub fn internal_date_millis(&self) -> Option<i64> {
        self.internal_date.as_deref()?.trim().parse().ok()
    }
}

/// Normalized, read-only projection of a provider message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSummary {
    pub id: String,
    pub thread_id: String,
    pub subject: String,
    pub from: String,
    pub snippet: String,
    pub received_at_epoch_millis: i64,
}

impl EmailSummary {
    /// Project a provider message, filling in defaults for missing
    /// fields. `now_millis` stands in for an absent receive time.
    #[must_use]
    pub fn from_message(message: &Message, now_millis: i64) -> Self {
        Self {
            id: message.id.clone(),
            thread_id: message.thread_id.clone(),
            subject: message.header("Subject").unwrap_or(NO_SUBJECT).to_string(),
            from: message.header("From").unwrap_or(UNKNOWN_SENDER).to_string(),
            snippet: message.snippet.clone().unwrap_or_default(),
            received_at_epoch_millis: message.internal_date_millis().unwrap_or(now_millis),
        }
    }
}

impl From<&Message> for EmailSummary {
    fn from(message: &Message) -> Self {
        Self::from_message(message, chrono::Utc::now().timestamp_millis())
    }
}

/// Body of list and search responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailList {
    pub emails: Vec<EmailSummary>,
    pub total_count: usize,
}

impl From<Vec<EmailSummary>> for EmailList {
    fn from(emails: Vec<EmailSummary>) -> Self {
        Self {
            total_count: emails.len(),
            emails,
        }
    }
}
