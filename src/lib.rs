//! Gmail gateway library
//!
//! A thin, read-only HTTP facade over the
//! [Gmail API](https://developers.google.com/gmail/api). Messages are
//! listed, fetched and searched on behalf of a mailbox and flattened
//! into [`EmailSummary`] records.
//!
//! Use [`GmailClient`] directly, or serve it over HTTP with
//! [`routes::router`].

mod client;
mod config;
mod connection;
mod credentials;
mod error;
mod format;
mod message;
pub mod routes;

pub use client::GmailClient;
pub use config::{GmailConfig, ServerConfig};
pub use connection::{GmailSession, connect};
pub use credentials::{Credentials, GMAIL_READONLY_SCOPE};
pub use error::{Error, Result};
pub use format::MessageFormat;
pub use message::{EmailList, EmailSummary, NO_SUBJECT, UNKNOWN_SENDER};
