//! Observability (logging)
//!
//! Structured logging for the send pipeline via `tracing`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging stack
///
/// Sets up:
/// - Pretty formatting (debug builds) or JSON formatting (release builds)
/// - `RUST_LOG` based filtering, falling back to `default_filter`
///
/// # Example
///
/// ```rust,no_run
/// use mdmail::observability;
///
/// # fn main() -> anyhow::Result<()> {
/// observability::init(&observability::LogConfig::default())?;
/// tracing::info!("mdmail started");
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init(config: &LogConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_filter()));

    if config.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init()?;
    }

    Ok(())
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Emit JSON lines instead of human readable output
    pub json: bool,

    /// Enable debug output for the mdmail crates
    pub verbose: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            json: !cfg!(debug_assertions),
            verbose: false,
        }
    }
}

impl LogConfig {
    /// Enable debug output
    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Choose JSON output
    #[must_use]
    pub const fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Filter directive used when `RUST_LOG` is unset
    #[must_use]
    pub const fn default_filter(&self) -> &'static str {
        if self.verbose {
            "info,mdmail=debug,mdmail_cli=debug"
        } else {
            "info"
        }
    }
}
