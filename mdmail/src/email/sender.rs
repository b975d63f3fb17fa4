//! The Markdown email pipeline
//!
//! [`MailSender`] ties the pieces together: read the stylesheet, render the
//! Markdown, build the MIME message, hand it to a [`MailTransport`].
//! Everything before the transport runs without touching the network, so a
//! missing stylesheet or a malformed address never opens a connection.

use lettre::Message;
use tracing::{debug, error, info, info_span};

use super::{EmailRequest, MailError, MailTransport, RenderedEmail, SmtpBackend, Stylesheet};
use crate::config::MailerConfig;

/// Sends Markdown emails through a transport
///
/// # Examples
///
/// ```rust,no_run
/// use mdmail::config::MailerConfig;
/// use mdmail::email::{EmailRequest, MailSender};
///
/// # fn example() -> Result<(), mdmail::email::MailError> {
/// let sender = MailSender::from_config(MailerConfig::from_env()?);
///
/// sender.send(&EmailRequest::new(
///     "user@example.com",
///     "Hello!",
///     "# Hello\n\nThis is **Markdown**.",
/// ))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MailSender<T> {
    from_address: String,
    stylesheet: Stylesheet,
    transport: T,
}

impl MailSender<SmtpBackend> {
    /// Create a sender that delivers over SMTP as described by `config`
    #[must_use]
    pub fn from_config(config: MailerConfig) -> Self {
        let MailerConfig { smtp, stylesheet } = config;
        let from_address = smtp.from_address.clone();

        Self::new(from_address, stylesheet, SmtpBackend::new(smtp))
    }
}

impl<T: MailTransport> MailSender<T> {
    /// Create a sender with an explicit transport
    #[must_use]
    pub fn new(
        from_address: impl Into<String>,
        stylesheet: impl Into<Stylesheet>,
        transport: T,
    ) -> Self {
        Self {
            from_address: from_address.into(),
            stylesheet: stylesheet.into(),
            transport,
        }
    }

    /// The transport messages are handed to
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Read the stylesheet and render `request` into an HTML document
    ///
    /// # Errors
    ///
    /// Returns `MailError::StylesheetRead` if the stylesheet cannot be read,
    /// or `MailError::InvalidAddress` for an unusable sender or recipient
    pub fn render(&self, request: &EmailRequest) -> Result<RenderedEmail, MailError> {
        let css = self.stylesheet.load()?;

        let rendered = RenderedEmail::new(
            &self.from_address,
            &request.recipient,
            request.subject.as_str(),
            &request.markdown,
            &css,
        )?;
        debug!(html_bytes = rendered.html.len(), "Rendered Markdown email");

        Ok(rendered)
    }

    /// Render `request` into a message without sending it
    ///
    /// # Errors
    ///
    /// Any error from [`MailSender::render`], or `MailError::Message` if the
    /// MIME message cannot be assembled
    pub fn prepare(&self, request: &EmailRequest) -> Result<Message, MailError> {
        self.render(request)?.into_message()
    }

    /// Render and deliver `request`
    ///
    /// Failures are logged here and returned to the caller; nothing is
    /// retried.
    ///
    /// # Errors
    ///
    /// Any error from [`MailSender::prepare`], or the transport's
    /// `MailError::Transport`, `MailError::Auth` or `MailError::Delivery`
    pub fn send(&self, request: &EmailRequest) -> Result<(), MailError> {
        let span = info_span!("send_email", to = %request.recipient, subject = %request.subject);
        let _guard = span.enter();

        let result = self
            .prepare(request)
            .and_then(|message| self.transport.send(&message));

        match &result {
            Ok(()) => info!("Email sent"),
            Err(err) => error!(error = %err, "Failed to send email"),
        }

        result
    }

    /// Render and deliver a message built from its three parts
    ///
    /// # Errors
    ///
    /// See [`MailSender::send`]
    pub fn send_markdown(
        &self,
        recipient: &str,
        subject: &str,
        markdown: &str,
    ) -> Result<(), MailError> {
        self.send(&EmailRequest::new(recipient, subject, markdown))
    }
}

/// Send one Markdown email over SMTP using `config`
///
/// # Errors
///
/// See [`MailSender::send`]
pub fn send_markdown_email(
    config: &MailerConfig,
    recipient: &str,
    subject: &str,
    markdown: &str,
) -> Result<(), MailError> {
    MailSender::from_config(config.clone()).send_markdown(recipient, subject, markdown)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use mockall::predicate::always;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::email::MockMailTransport;

    const CSS: &str = "h1 { color: #c00; }";

    fn stylesheet() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(CSS.as_bytes()).unwrap();
        file
    }

    fn request() -> EmailRequest {
        EmailRequest::new("recipient@example.com", "Greetings", "# こんにちは\n\n- one\n- two")
    }

    #[test]
    fn test_missing_stylesheet_never_reaches_transport() {
        let dir = tempfile::tempdir().unwrap();
        let mut transport = MockMailTransport::new();
        transport.expect_send().never();

        let sender = MailSender::new(
            "sender@example.com",
            dir.path().join("css/styles.css"),
            transport,
        );

        let err = sender.send(&request()).unwrap_err();
        assert!(matches!(err, MailError::StylesheetRead { .. }));
    }

    #[test]
    fn test_invalid_recipient_never_reaches_transport() {
        let css = stylesheet();
        let mut transport = MockMailTransport::new();
        transport.expect_send().never();

        let sender = MailSender::new("sender@example.com", css.path(), transport);
        let err = sender
            .send_markdown("definitely not an address", "Hi", "body")
            .unwrap_err();

        assert!(matches!(err, MailError::InvalidAddress(_)));
    }

    #[test]
    fn test_auth_failure_is_returned_not_raised() {
        let css = stylesheet();
        let mut transport = MockMailTransport::new();
        transport
            .expect_send()
            .with(always())
            .times(1)
            .returning(|_| Err(MailError::auth("535 5.7.8 Authentication credentials invalid")));

        let sender = MailSender::new("sender@example.com", css.path(), transport);
        let result = sender.send(&request());

        assert!(matches!(result, Err(MailError::Auth(_))));
    }

    #[test]
    fn test_successful_send_builds_expected_message() {
        let css = stylesheet();
        let mut transport = MockMailTransport::new();
        transport
            .expect_send()
            .times(1)
            .withf(|message: &Message| {
                let headers = message.headers();
                let formatted = String::from_utf8_lossy(&message.formatted()).into_owned();

                headers.get_raw("From") == Some("sender@example.com")
                    && headers.get_raw("To") == Some("recipient@example.com")
                    && headers.get_raw("Subject") == Some("Greetings")
                    && formatted.matches("Content-Type: text/html").count() == 1
                    && formatted.contains("Content-Type: multipart/alternative")
            })
            .returning(|_| Ok(()));

        let sender = MailSender::new("sender@example.com", css.path(), transport);
        assert!(sender.send(&request()).is_ok());
    }

    #[test]
    fn test_prepare_sets_envelope() {
        let sender = MailSender::new(
            "sender@example.com",
            Stylesheet::inline(CSS),
            MockMailTransport::new(),
        );

        let message = sender.prepare(&request()).unwrap();
        assert_eq!(message.envelope().to().len(), 1);
        assert_eq!(
            message.envelope().from().map(ToString::to_string),
            Some("sender@example.com".to_string())
        );
    }

    #[test]
    fn test_stylesheet_is_read_on_every_send() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("styles.css");
        std::fs::write(&path, CSS).unwrap();

        let mut transport = MockMailTransport::new();
        transport.expect_send().times(1).returning(|_| Ok(()));

        let sender = MailSender::new("sender@example.com", path.clone(), transport);
        assert!(sender.send(&request()).is_ok());

        std::fs::remove_file(&path).unwrap();
        let err = sender.send(&request()).unwrap_err();
        assert!(matches!(err, MailError::StylesheetRead { .. }));
    }
}
