//! Markdown to HTML email rendering

use lettre::{
    message::{Mailbox, MultiPart, SinglePart},
    Message,
};
use pulldown_cmark::{html, Options, Parser};

use crate::email::MailError;

/// Markdown extensions enabled on top of CommonMark
const MARKDOWN_OPTIONS: Options = Options::ENABLE_TABLES
    .union(Options::ENABLE_FOOTNOTES)
    .union(Options::ENABLE_STRIKETHROUGH)
    .union(Options::ENABLE_TASKLISTS);

/// Render Markdown to an HTML fragment
#[inline]
#[must_use]
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, MARKDOWN_OPTIONS);
    let mut buf = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut buf, parser);
    buf
}

/// Wrap an HTML fragment in a document carrying `css` in its `<style>` block
///
/// Neither argument is escaped.
#[must_use]
pub fn wrap_document(body_html: &str, css: &str) -> String {
    format!("<html><head><style>{css}</style></head><body>{body_html}</body></html>")
}

/// A fully rendered email, ready to become a MIME message
#[derive(Debug, Clone)]
pub struct RenderedEmail {
    /// Sender mailbox
    pub from: Mailbox,
    /// Recipient mailbox
    pub to: Mailbox,
    /// Subject line
    pub subject: String,
    /// Complete HTML document
    pub html: String,
}

impl RenderedEmail {
    /// Render `markdown` with `css` into an email from `from` to `to`
    ///
    /// # Errors
    ///
    /// Returns `MailError::InvalidAddress` if either address cannot be parsed
    /// into a mailbox
    pub fn new(
        from: &str,
        to: &str,
        subject: impl Into<String>,
        markdown: &str,
        css: &str,
    ) -> Result<Self, MailError> {
        Ok(Self {
            from: parse_mailbox(from)?,
            to: parse_mailbox(to)?,
            subject: subject.into(),
            html: wrap_document(&markdown_to_html(markdown), css),
        })
    }

    /// Build a `multipart/alternative` message with a single `text/html` part
    ///
    /// # Errors
    ///
    /// Returns `MailError::Message` if lettre refuses to assemble the message
    pub fn into_message(self) -> Result<Message, MailError> {
        let message = Message::builder()
            .from(self.from)
            .to(self.to)
            .subject(self.subject)
            .multipart(MultiPart::alternative().singlepart(SinglePart::html(self.html)))?;

        Ok(message)
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .trim()
        .parse()
        .map_err(|_| MailError::InvalidAddress(address.to_string()))
}
