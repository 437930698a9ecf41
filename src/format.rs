//! Gmail message formats
//!
//! The `format` query parameter of `users.messages.get` decides how
//! much of a message the provider returns. Listing only needs header
//! metadata; fetching by id asks for the full message.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// How much of a message the provider should return.
///
/// # Examples
///
/// ```
/// use gmail_gateway::MessageFormat;
///
/// assert_eq!(MessageFormat::Metadata.as_str(), "metadata");
/// assert_eq!("FULL".parse::<MessageFormat>().unwrap(), MessageFormat::Full);
/// assert!("raw".parse::<MessageFormat>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MessageFormat {
    /// Ids, labels and the requested headers.
    Metadata,
    /// The parsed message including payload parts.
    #[default]
    Full,
}

impl MessageFormat {
    /// The wire value of the `format` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Metadata => "metadata",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for MessageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Metadata, Self::Full]
            .into_iter()
            .find(|f| s.eq_ignore_ascii_case(f.as_str()))
            .ok_or_else(|| Error::Config(format!("Unknown message format: {s}")))
    }
}
