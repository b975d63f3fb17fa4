//! SMTP backend for sending emails
//!
//! Uses `lettre`'s blocking SMTP client to deliver one message per
//! connection. Each protocol stage (connect, STARTTLS, AUTH, submission) is
//! driven explicitly so failures can be reported as transport, authentication
//! or delivery errors.

use lettre::{
    transport::smtp::{
        authentication::{Credentials, DEFAULT_MECHANISMS},
        client::{SmtpConnection, TlsParameters},
        extension::ClientId,
        Error as SmtpError,
    },
    Message,
};
use tracing::{debug, warn};

use crate::config::{SmtpConfig, SmtpSecurity};
use crate::email::{MailError, MailTransport};

/// SMTP email backend
///
/// Opens a fresh connection for every message and closes it before
/// returning, whether delivery succeeded or not.
///
/// # Examples
///
/// ```rust,no_run
/// use mdmail::config::SmtpConfig;
/// use mdmail::email::SmtpBackend;
///
/// let config = SmtpConfig::new("smtp.example.com", "user", "password", "me@example.com")
///     .with_port(587);
/// let backend = SmtpBackend::new(config);
/// ```
#[derive(Debug, Clone)]
pub struct SmtpBackend {
    config: SmtpConfig,
    hello_name: ClientId,
}

impl SmtpBackend {
    /// Create a new SMTP backend with the given configuration
    #[must_use]
    pub fn new(config: SmtpConfig) -> Self {
        Self {
            config,
            hello_name: ClientId::default(),
        }
    }

    /// Create a new SMTP backend from environment variables
    ///
    /// # Errors
    ///
    /// Returns `MailError::ConfigMissing` if required environment variables are missing
    pub fn from_env() -> Result<Self, MailError> {
        Ok(Self::new(SmtpConfig::from_env()?))
    }

    /// Override the name sent with EHLO (defaults to the local hostname)
    #[must_use]
    pub fn with_hello_name(mut self, hello_name: ClientId) -> Self {
        self.hello_name = hello_name;
        self
    }

    /// The configuration this backend connects with
    #[must_use]
    pub const fn config(&self) -> &SmtpConfig {
        &self.config
    }

    fn tls_parameters(&self) -> Result<TlsParameters, MailError> {
        TlsParameters::new(self.config.host.clone())
            .map_err(|e| MailError::transport(format!("TLS parameters error: {e}")))
    }

    fn connect(&self) -> Result<Session, MailError> {
        let implicit_tls = match self.config.security {
            SmtpSecurity::Tls => Some(self.tls_parameters()?),
            SmtpSecurity::StartTls | SmtpSecurity::None => None,
        };

        debug!(
            host = %self.config.host,
            port = self.config.port,
            security = ?self.config.security,
            "Connecting to SMTP server"
        );

        let conn = SmtpConnection::connect(
            (self.config.host.as_str(), self.config.port),
            Some(self.config.timeout()),
            &self.hello_name,
            implicit_tls.as_ref(),
            None,
        )
        .map_err(MailError::transport)?;

        Ok(Session { conn, closed: false })
    }
}

impl MailTransport for SmtpBackend {
    fn send(&self, message: &Message) -> Result<(), MailError> {
        let mut session = self.connect()?;

        if self.config.security == SmtpSecurity::StartTls {
            let tls_parameters = self.tls_parameters()?;
            session.starttls(&tls_parameters, &self.hello_name)?;
        }

        let credentials =
            Credentials::new(self.config.username.clone(), self.config.password.clone());
        session.login(&credentials)?;
        session.submit(message)?;
        session.quit();

        Ok(())
    }
}

/// An open SMTP connection, aborted on drop unless closed with QUIT
struct Session {
    conn: SmtpConnection,
    closed: bool,
}

impl Session {
    fn starttls(&mut self, tls: &TlsParameters, hello_name: &ClientId) -> Result<(), MailError> {
        self.conn
            .starttls(tls, hello_name)
            .map_err(MailError::transport)?;
        debug!("Connection upgraded with STARTTLS");
        Ok(())
    }

    fn login(&mut self, credentials: &Credentials) -> Result<(), MailError> {
        self.conn
            .auth(DEFAULT_MECHANISMS, credentials)
            .map_err(|e| classify(e, MailError::auth))?;
        debug!("Authenticated with SMTP server");
        Ok(())
    }

    fn submit(&mut self, message: &Message) -> Result<(), MailError> {
        let response = self
            .conn
            .send(message.envelope(), &message.formatted())
            .map_err(|e| classify(e, MailError::delivery))?;
        debug!(code = %response.code(), "Message accepted");
        Ok(())
    }

    fn quit(&mut self) {
        if let Err(e) = self.conn.quit() {
            // The message is already accepted at this point.
            warn!(error = %e, "SMTP QUIT failed");
            self.conn.abort();
        }
        self.closed = true;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.closed {
            self.conn.abort();
        }
    }
}

/// Server replies and client-side refusals belong to the current stage;
/// anything else, including an unparseable reply, is a broken connection.
fn classify(err: SmtpError, stage: fn(SmtpError) -> MailError) -> MailError {
    if err.status().is_some() || err.is_client() {
        stage(err)
    } else {
        MailError::transport(err)
    }
}
