//! mdmail: Markdown to styled HTML email, delivered over SMTP
//!
//! A send is a short linear pipeline:
//! 1. Read the stylesheet (fails before any network I/O if it is missing)
//! 2. Render the Markdown body to HTML
//! 3. Wrap it in a document with the stylesheet in a `<style>` block
//! 4. Build a `multipart/alternative` message with one `text/html` part
//! 5. Connect, STARTTLS, log in, submit, quit
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mdmail::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     observability::init(&LogConfig::default())?;
//!
//!     let config = MailerConfig::from_env()?;
//!     let sender = MailSender::from_config(config);
//!
//!     sender.send(&EmailRequest::new(
//!         "to_address@example.com",
//!         "Markdown to HTML",
//!         "# Hello\n\nThis is a **Markdown** email.",
//!     ))?;
//!
//!     Ok(())
//! }
//! ```

#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod email;
pub mod observability;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! ```rust
    //! use mdmail::prelude::*;
    //! ```

    pub use crate::config::{MailerConfig, SmtpConfig, SmtpSecurity};
    pub use crate::email::{
        ConsoleBackend, EmailRequest, MailError, MailSender, MailTransport, MemoryBackend,
        RenderedEmail, SmtpBackend, Stylesheet,
    };
    pub use crate::observability::{self, LogConfig};
}
