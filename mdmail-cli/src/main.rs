//! mdmail: send a Markdown file as a styled HTML email

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::process::ExitCode;

use clap::Parser;
use console::style;
use mdmail::observability;
use mdmail_cli::{run, Cli};

fn main() -> ExitCode {
    // A missing .env is fine; the real environment may already be set.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(err) = observability::init(&cli.log_config()) {
        eprintln!("{} {err:#}", style("error:").red().bold());
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", style("error:").red().bold());
            ExitCode::FAILURE
        }
    }
}
