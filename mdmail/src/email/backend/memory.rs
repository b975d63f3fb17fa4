//! In-memory backend
//!
//! Captures sent messages for assertions instead of delivering them.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lettre::Message;

use crate::email::{MailError, MailTransport};

/// In-memory email backend
///
/// Clones share the same mailbox, so a test can keep one handle while the
/// sender owns another.
///
/// # Examples
///
/// ```rust
/// use mdmail::email::{MailTransport, MemoryBackend, RenderedEmail};
///
/// # fn example() -> Result<(), mdmail::email::MailError> {
/// let backend = MemoryBackend::new();
///
/// let message = RenderedEmail::new(
///     "noreply@example.com",
///     "user@example.com",
///     "Test",
///     "Hello",
///     "",
/// )?
/// .into_message()?;
///
/// backend.send(&message)?;
///
/// assert_eq!(backend.sent_count(), 1);
/// assert!(backend.was_sent_to("user@example.com"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    sent: Arc<Mutex<Vec<Message>>>,
}

impl MemoryBackend {
    /// Create an empty backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn sent(&self) -> MutexGuard<'_, Vec<Message>> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of messages sent
    #[must_use]
    pub fn sent_count(&self) -> usize {
        self.sent().len()
    }

    /// All sent messages, oldest first
    #[must_use]
    pub fn sent_messages(&self) -> Vec<Message> {
        self.sent().clone()
    }

    /// The most recently sent message
    #[must_use]
    pub fn last_sent(&self) -> Option<Message> {
        self.sent().last().cloned()
    }

    /// Forget everything sent so far
    pub fn clear(&self) {
        self.sent().clear();
    }

    /// Whether any message was addressed to `address` in its envelope
    #[must_use]
    pub fn was_sent_to(&self, address: &str) -> bool {
        self.sent().iter().any(|message| {
            message
                .envelope()
                .to()
                .iter()
                .any(|to| AsRef::<str>::as_ref(to) == address)
        })
    }

    /// Whether any message carried `subject`
    #[must_use]
    pub fn was_sent_with_subject(&self, subject: &str) -> bool {
        self.sent()
            .iter()
            .any(|message| message.headers().get_raw("Subject") == Some(subject))
    }
}

impl MailTransport for MemoryBackend {
    fn send(&self, message: &Message) -> Result<(), MailError> {
        self.sent().push(message.clone());
        Ok(())
    }
}
