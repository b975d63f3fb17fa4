//! A single Markdown email to send

use serde::{Deserialize, Serialize};

/// One email, as written by the caller
///
/// ```rust
/// use mdmail::email::EmailRequest;
///
/// let request = EmailRequest::new("user@example.com", "Weekly notes", "# Notes\n\n- one\n- two");
/// assert_eq!(request.recipient, "user@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRequest {
    /// Recipient address (To)
    pub recipient: String,

    /// Email subject
    pub subject: String,

    /// Markdown body
    pub markdown: String,
}

impl EmailRequest {
    /// Create a new request
    #[must_use]
    pub fn new(
        recipient: impl Into<String>,
        subject: impl Into<String>,
        markdown: impl Into<String>,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            subject: subject.into(),
            markdown: markdown.into(),
        }
    }
}
