//! Stylesheet sources
//!
//! The stylesheet is injected verbatim into the `<style>` block of every
//! rendered message. It either comes from a file, read fresh for each send,
//! or is supplied inline by the caller.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::email::MailError;

/// Where the CSS for a message comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stylesheet {
    /// Read from a file on every send
    File(PathBuf),
    /// Use the given CSS text as is
    Inline(String),
}

impl Stylesheet {
    /// Stylesheet read from `path`
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Stylesheet supplied directly
    #[must_use]
    pub fn inline(css: impl Into<String>) -> Self {
        Self::Inline(css.into())
    }

    /// Resolve the stylesheet to CSS text
    ///
    /// The file handle is closed before this returns, on success or failure.
    ///
    /// # Errors
    ///
    /// Returns `MailError::StylesheetRead` if the file is missing or unreadable
    pub fn load(&self) -> Result<String, MailError> {
        match self {
            Self::File(path) => read_stylesheet(path),
            Self::Inline(css) => Ok(css.clone()),
        }
    }
}

impl From<&Path> for Stylesheet {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

impl From<PathBuf> for Stylesheet {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

fn read_stylesheet(path: &Path) -> Result<String, MailError> {
    fs::read_to_string(path).map_err(|source| MailError::StylesheetRead {
        path: path.to_path_buf(),
        source,
    })
}
