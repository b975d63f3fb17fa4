//! Email backend implementations
//!
//! This module provides different backend implementations for delivering
//! assembled messages:
//! - **SMTP**: Deliver via an SMTP relay with STARTTLS and login (production)
//! - **Console**: Print messages to the console (development, dry runs)
//! - **Memory**: Record messages in memory (tests)

pub mod console;
pub mod memory;
pub mod smtp;

use lettre::Message;

use super::MailError;

/// Trait for delivering a fully built message
///
/// Implemented by all email backends (SMTP, console, memory).
///
/// # Examples
///
/// ```rust,no_run
/// use mdmail::config::SmtpConfig;
/// use mdmail::email::{MailTransport, RenderedEmail, SmtpBackend};
///
/// # fn example() -> Result<(), mdmail::email::MailError> {
/// let backend = SmtpBackend::new(SmtpConfig::from_env()?);
///
/// let message = RenderedEmail::new(
///     "noreply@example.com",
///     "user@example.com",
///     "Hello!",
///     "# Hello, World!",
///     "",
/// )?
/// .into_message()?;
///
/// backend.send(&message)?;
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait MailTransport {
    /// Deliver one message to every address in its envelope
    ///
    /// # Errors
    ///
    /// Returns `MailError::Transport`, `MailError::Auth` or
    /// `MailError::Delivery` depending on where delivery failed
    fn send(&self, message: &Message) -> Result<(), MailError>;
}

impl<T: MailTransport + ?Sized> MailTransport for &T {
    fn send(&self, message: &Message) -> Result<(), MailError> {
        (**self).send(message)
    }
}

impl<T: MailTransport + ?Sized> MailTransport for Box<T> {
    fn send(&self, message: &Message) -> Result<(), MailError> {
        (**self).send(message)
    }
}
