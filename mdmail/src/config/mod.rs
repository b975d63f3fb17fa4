//! Configuration management for mdmail
//!
//! A send needs an SMTP relay and a stylesheet. Both are described by
//! [`MailerConfig`], which the caller builds once and hands to the sender.
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority)
//! 2. An optional TOML file passed to [`MailerConfig::load_from`]
//! 3. Hardcoded defaults (fallback)
//!
//! # Environment Variables
//!
//! | Variable            | Field                  | Required |
//! |---------------------|------------------------|----------|
//! | `SMTP_SERVER`       | `smtp.host`            | yes      |
//! | `SMTP_PORT`         | `smtp.port`            | no (587) |
//! | `SMTP_USER`         | `smtp.username`        | yes      |
//! | `SMTP_PASSWORD`     | `smtp.password`        | yes      |
//! | `FROM_ADDRESS`      | `smtp.from_address`    | yes      |
//! | `SMTP_SECURITY`     | `smtp.security`        | no (`starttls`) |
//! | `MDMAIL_STYLESHEET` | `stylesheet`           | no (`./css/styles.css`) |
//!
//! # Example Configuration
//!
//! ```toml
//! # mdmail.toml
//! stylesheet = "./css/styles.css"
//!
//! [smtp]
//! host = "smtp.example.com"
//! port = 587
//! username = "mailer@example.com"
//! password = "secret"
//! from_address = "mailer@example.com"
//! security = "starttls"
//! ```

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::email::MailError;

/// Default stylesheet location, relative to the working directory
pub const DEFAULT_STYLESHEET: &str = "./css/styles.css";

/// Default SMTP submission port (STARTTLS)
pub const DEFAULT_PORT: u16 = 587;

/// Default socket timeout, matching lettre's transport default
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const SMTP_SERVER: &str = "SMTP_SERVER";
const SMTP_PORT: &str = "SMTP_PORT";
const SMTP_USER: &str = "SMTP_USER";
const SMTP_PASSWORD: &str = "SMTP_PASSWORD";
const FROM_ADDRESS: &str = "FROM_ADDRESS";
const SMTP_SECURITY: &str = "SMTP_SECURITY";
const MDMAIL_STYLESHEET: &str = "MDMAIL_STYLESHEET";

/// Connection security for the SMTP session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Connect in plaintext, then upgrade with STARTTLS before authenticating
    #[default]
    StartTls,
    /// Negotiate TLS immediately on connect (usually port 465)
    Tls,
    /// Never encrypt; only for local development relays
    None,
}

impl FromStr for SmtpSecurity {
    type Err = MailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "starttls" => Ok(Self::StartTls),
            "tls" | "ssl" => Ok(Self::Tls),
            "none" | "plain" => Ok(Self::None),
            other => Err(MailError::config(format!(
                "{SMTP_SECURITY} must be one of starttls, tls, none (got {other:?})"
            ))),
        }
    }
}

/// SMTP relay configuration
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// SMTP server hostname
    pub host: String,

    /// SMTP server port (usually 587 for STARTTLS, 465 for TLS)
    #[serde(default = "default_port")]
    pub port: u16,

    /// SMTP username
    pub username: String,

    /// SMTP password
    pub password: String,

    /// Envelope sender and `From` header
    pub from_address: String,

    /// Connection security (default: STARTTLS)
    #[serde(default)]
    pub security: SmtpSecurity,

    /// Socket timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("from_address", &self.from_address)
            .field("security", &self.security)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl SmtpConfig {
    /// Create a STARTTLS configuration on the default port
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        from_address: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            username: username.into(),
            password: password.into(),
            from_address: from_address.into(),
            security: SmtpSecurity::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set the server port
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the connection security
    #[must_use]
    pub const fn with_security(mut self, security: SmtpSecurity) -> Self {
        self.security = security;
        self
    }

    /// Set the socket timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs();
        self
    }

    /// Socket timeout as a [`Duration`]
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Create SMTP configuration from environment variables
    ///
    /// Expects `SMTP_SERVER`, `SMTP_USER`, `SMTP_PASSWORD` and `FROM_ADDRESS`;
    /// `SMTP_PORT` defaults to 587 and `SMTP_SECURITY` to `starttls`.
    ///
    /// # Errors
    ///
    /// Returns `MailError::ConfigMissing` naming the first absent variable, or
    /// `MailError::Config` if the port or security mode cannot be parsed
    pub fn from_env() -> Result<Self, MailError> {
        let mut config = Self::new(
            require_env(SMTP_SERVER)?,
            require_env(SMTP_USER)?,
            require_env(SMTP_PASSWORD)?,
            require_env(FROM_ADDRESS)?,
        );

        if let Some(port) = env_port()? {
            config.port = port;
        }

        if let Some(security) = optional_env(SMTP_SECURITY) {
            config.security = security.parse()?;
        }

        Ok(config)
    }
}

/// Complete configuration for one send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailerConfig {
    /// SMTP relay settings
    pub smtp: SmtpConfig,

    /// Stylesheet injected into every message
    #[serde(default = "default_stylesheet")]
    pub stylesheet: PathBuf,
}

fn default_stylesheet() -> PathBuf {
    PathBuf::from(DEFAULT_STYLESHEET)
}

impl MailerConfig {
    /// Create configuration with the default stylesheet path
    #[must_use]
    pub fn new(smtp: SmtpConfig) -> Self {
        Self {
            smtp,
            stylesheet: default_stylesheet(),
        }
    }

    /// Use a different stylesheet
    #[must_use]
    pub fn with_stylesheet(mut self, path: impl Into<PathBuf>) -> Self {
        self.stylesheet = path.into();
        self
    }

    /// Load configuration from environment variables only
    ///
    /// # Errors
    ///
    /// See [`SmtpConfig::from_env`]
    pub fn from_env() -> Result<Self, MailError> {
        let config = Self::new(SmtpConfig::from_env()?);

        Ok(match optional_env(MDMAIL_STYLESHEET) {
            Some(path) => config.with_stylesheet(path),
            None => config,
        })
    }

    /// Load configuration from a TOML file, with environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file at `path` does not exist or contains invalid TOML
    /// - A required field is missing from the merged configuration
    /// - A value fails type conversion
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use mdmail::config::MailerConfig;
    ///
    /// # fn example() -> Result<(), mdmail::email::MailError> {
    /// let config = MailerConfig::load_from("./mdmail.toml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, MailError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(MailError::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }

        let config = Self::figment(Some(path))?.extract()?;
        Ok(config)
    }

    /// Build the layered figment backing [`MailerConfig::load_from`]
    ///
    /// # Errors
    ///
    /// Returns `MailError::Config` if `SMTP_PORT` is set but not a valid port
    pub fn figment(path: Option<&Path>) -> Result<Figment, MailError> {
        let mut figment = Figment::new()
            // Defaults (lowest priority)
            .merge(Serialized::default("stylesheet", DEFAULT_STYLESHEET));

        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }

        // Environment variables override everything
        for (var, key) in [
            (SMTP_SERVER, "smtp.host"),
            (SMTP_USER, "smtp.username"),
            (SMTP_PASSWORD, "smtp.password"),
            (FROM_ADDRESS, "smtp.from_address"),
            (MDMAIL_STYLESHEET, "stylesheet"),
        ] {
            if let Some(value) = optional_env(var) {
                figment = figment.merge(Serialized::default(key, value));
            }
        }

        if let Some(port) = env_port()? {
            figment = figment.merge(Serialized::default("smtp.port", port));
        }

        if let Some(security) = optional_env(SMTP_SECURITY) {
            let security: SmtpSecurity = security.parse()?;
            figment = figment.merge(Serialized::default("smtp.security", security));
        }

        Ok(figment)
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn require_env(key: &str) -> Result<String, MailError> {
    optional_env(key).ok_or_else(|| MailError::ConfigMissing(key.to_string()))
}

fn env_port() -> Result<Option<u16>, MailError> {
    optional_env(SMTP_PORT)
        .map(|value| {
            value.trim().parse().map_err(|_| {
                MailError::config(format!(
                    "{SMTP_PORT} must be a valid port number (got {value:?})"
                ))
            })
        })
        .transpose()
}
