//! Console backend for development
//!
//! Prints messages to the console instead of sending them.
//! Used by `mdmail --dry-run` and handy when styling a stylesheet.

use lettre::Message;
use tracing::{debug, info};

use crate::email::{MailError, MailTransport};

/// Console email backend for development
///
/// Logs messages to the console instead of sending them.
/// Useful for previewing output without SMTP credentials.
///
/// # Examples
///
/// ```rust
/// use mdmail::email::{ConsoleBackend, MailTransport, RenderedEmail};
///
/// # fn example() -> Result<(), mdmail::email::MailError> {
/// let backend = ConsoleBackend::new();
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
/// backend.send(&message)?; // Prints to console
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConsoleBackend {
    /// Whether to print the full MIME source
    verbose: bool,
}

impl ConsoleBackend {
    /// Create a new console backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a verbose console backend that prints the full MIME source
    #[must_use]
    pub const fn verbose() -> Self {
        Self { verbose: true }
    }
}

impl MailTransport for ConsoleBackend {
    fn send(&self, message: &Message) -> Result<(), MailError> {
        let headers = message.headers();
        let from = headers.get_raw("From").unwrap_or_default();
        let to = headers.get_raw("To").unwrap_or_default();
        let subject = headers.get_raw("Subject").unwrap_or_default();

        info!(from = %from, to = %to, subject = %subject, "Console email sent");

        println!("\n╭─────────────────────────────────────────────────────╮");
        println!("│ 📧 Console Email                                     │");
        println!("├─────────────────────────────────────────────────────┤");
        println!("│ From:    {from:<43} │");
        println!("│ To:      {to:<43} │");
        println!("│ Subject: {subject:<43} │");
        println!("╰─────────────────────────────────────────────────────╯");

        let formatted = message.formatted();
        debug!(bytes = formatted.len(), "Formatted message");

        if self.verbose {
            println!("{}", String::from_utf8_lossy(&formatted));
        }

        Ok(())
    }
}
