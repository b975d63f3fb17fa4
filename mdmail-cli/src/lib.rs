//! mdmail CLI library
//!
//! Argument parsing and the single send the `mdmail` binary performs.

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use mdmail::prelude::*;
use tracing::debug;

/// Input path that means "read the Markdown from stdin"
pub const STDIN: &str = "-";

/// Send a Markdown file as a styled HTML email
#[derive(Debug, Parser)]
#[allow(clippy::struct_excessive_bools)]
#[command(name = "mdmail")]
#[command(version)]
#[command(about = "Send a Markdown file as a styled HTML email", long_about = None)]
pub struct Cli {
    /// Recipient address
    #[arg(short, long, value_name = "ADDRESS")]
    pub to: String,

    /// Subject line
    #[arg(short, long)]
    pub subject: String,

    /// TOML configuration file (environment variables take precedence)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Stylesheet to embed instead of the configured one
    #[arg(long, value_name = "FILE")]
    pub stylesheet: Option<PathBuf>,

    /// Print the rendered message instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging for mdmail
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines (default in release builds)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    /// Emit human readable logs (default in debug builds)
    #[arg(long)]
    pub pretty: bool,

    /// Markdown file to send, or `-` for stdin
    #[arg(value_name = "FILE", default_value = STDIN)]
    pub input: PathBuf,
}

impl Cli {
    /// Logging setup requested on the command line
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        let config = LogConfig::default().with_verbose(self.verbose);
        if self.json {
            config.with_json(true)
        } else if self.pretty {
            config.with_json(false)
        } else {
            config
        }
    }

    /// Resolve the mailer configuration from `--config`, the environment and
    /// `--stylesheet`
    ///
    /// # Errors
    ///
    /// Returns an error if a required setting is missing or malformed
    pub fn mailer_config(&self) -> Result<MailerConfig> {
        let config = match &self.config {
            Some(path) => MailerConfig::load_from(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => MailerConfig::from_env().context("failed to read SMTP settings")?,
        };

        Ok(match &self.stylesheet {
            Some(path) => config.with_stylesheet(path),
            None => config,
        })
    }
}

/// Read the Markdown body from `path`, or stdin for `-`
///
/// # Errors
///
/// Returns an error if the input cannot be read or is not UTF-8
pub fn read_markdown(path: &Path) -> Result<String> {
    if path == Path::new(STDIN) {
        let mut markdown = String::new();
        io::stdin()
            .read_to_string(&mut markdown)
            .context("failed to read Markdown from stdin")?;
        return Ok(markdown);
    }

    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Perform the send described by `cli`
///
/// # Errors
///
/// Returns an error if configuration, input, rendering or delivery fails
pub fn run(cli: &Cli) -> Result<()> {
    let config = cli.mailer_config()?;
    let markdown = read_markdown(&cli.input)?;
    debug!(input = %cli.input.display(), bytes = markdown.len(), "Read Markdown input");

    let request = EmailRequest::new(cli.to.as_str(), cli.subject.as_str(), markdown);

    if cli.dry_run {
        let MailerConfig { smtp, stylesheet } = config;
        MailSender::new(smtp.from_address, stylesheet, ConsoleBackend::verbose())
            .send(&request)?;

        println!(
            "{} {}",
            style("Dry run:").yellow().bold(),
            style("nothing was sent").dim()
        );
    } else {
        MailSender::from_config(config).send(&request)?;

        println!(
            "{} Email sent to {}",
            style("✓").green(),
            style(&cli.to).bold()
        );
    }

    Ok(())
}
