//! Email error types

use std::path::PathBuf;

use figment::error::Kind;
use thiserror::Error;

/// Errors that can occur while preparing or delivering a Markdown email
///
/// Every failure of a send attempt maps onto exactly one variant, so callers can
/// tell a missing stylesheet from a rejected login without parsing messages.
#[derive(Debug, Error)]
pub enum MailError {
    /// A required configuration value is absent
    #[error("missing configuration value: {0}")]
    ConfigMissing(String),

    /// A configuration value is present but malformed
    #[error("email configuration error: {0}")]
    Config(String),

    /// The stylesheet could not be read
    #[error("failed to read stylesheet {}: {source}", .path.display())]
    StylesheetRead {
        /// Path that was being read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Invalid email address format
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// The MIME message could not be assembled
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    /// Connection, TLS negotiation, or I/O failure
    #[error("SMTP transport error: {0}")]
    Transport(String),

    /// The server rejected the credentials
    #[error("SMTP authentication failed: {0}")]
    Auth(String),

    /// The server rejected the sender, a recipient, or the message body
    #[error("SMTP delivery rejected: {0}")]
    Delivery(String),
}

impl MailError {
    /// Create a configuration error from a string message
    #[must_use]
    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::Config(msg.into())
    }

    /// Create a transport error from any displayable cause
    #[must_use]
    pub fn transport<T: ToString>(cause: T) -> Self {
        Self::Transport(cause.to_string())
    }

    /// Create an authentication error from any displayable cause
    #[must_use]
    pub fn auth<T: ToString>(cause: T) -> Self {
        Self::Auth(cause.to_string())
    }

    /// Create a delivery error from any displayable cause
    #[must_use]
    pub fn delivery<T: ToString>(cause: T) -> Self {
        Self::Delivery(cause.to_string())
    }

    /// Whether the failure happened while talking to the SMTP server
    #[must_use]
    pub const fn is_smtp(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Auth(_) | Self::Delivery(_)
        )
    }
}

impl From<figment::Error> for MailError {
    fn from(err: figment::Error) -> Self {
        match &err.kind {
            Kind::MissingField(field) => {
                let key = err
                    .path
                    .iter()
                    .map(String::as_str)
                    .chain(std::iter::once(&**field))
                    .collect::<Vec<_>>()
                    .join(".");
                Self::ConfigMissing(key)
            }
            _ => Self::Config(err.to_string()),
        }
    }
}
