//! Markdown email rendering and delivery
//!
//! This module provides the whole send pipeline:
//! - Markdown to HTML rendering with an injected stylesheet
//! - MIME `multipart/alternative` message assembly
//! - Multiple backends (SMTP, console, in-memory)
//!
//! # Examples
//!
//! ## Sending a Markdown email over SMTP
//!
//! ```rust,no_run
//! use mdmail::config::MailerConfig;
//! use mdmail::email::MailSender;
//!
//! # fn example() -> Result<(), mdmail::email::MailError> {
//! let sender = MailSender::from_config(MailerConfig::from_env()?);
//!
//! sender.send_markdown(
//!     "user@example.com",
//!     "Welcome!",
//!     "# Welcome\n\n- Read the docs\n- Say hello",
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Previewing without a server
//!
//! ```rust
//! use mdmail::email::{ConsoleBackend, MailSender, Stylesheet};
//!
//! # fn example() -> Result<(), mdmail::email::MailError> {
//! let sender = MailSender::new(
//!     "noreply@example.com",
//!     Stylesheet::inline("h1 { color: #333; }"),
//!     ConsoleBackend::new(),
//! );
//!
//! sender.send_markdown("user@example.com", "Preview", "# Hello")?;
//! # Ok(())
//! # }
//! ```

mod backend;
mod error;
mod render;
mod request;
mod sender;
mod stylesheet;

pub use backend::{
    console::ConsoleBackend, memory::MemoryBackend, smtp::SmtpBackend, MailTransport,
};
pub use error::MailError;
pub use render::{markdown_to_html, wrap_document, RenderedEmail};
pub use request::EmailRequest;
pub use sender::{send_markdown_email, MailSender};
pub use stylesheet::Stylesheet;

#[cfg(test)]
pub use backend::MockMailTransport;
