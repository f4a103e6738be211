//! Version marker handling.
//!
//! The standard library version lives in a plain text marker file
//! (`lib/version` by default). It is read once per run, stamped into the
//! generated module, and used as the release directory name.

use crate::error::{PackagerError, Result};
use camino::Utf8Path;
use std::fmt;
use std::io;

/// A validated, immutable version string such as `v0.4.5`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionTag(String);

impl VersionTag {
    /// Read the version marker at `path`.
    ///
    /// Surrounding whitespace, including the trailing newline most editors
    /// add, is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::VersionFileNotFound`] if the file is absent,
    /// [`PackagerError::ReadFailed`] if it cannot be read, and
    /// [`PackagerError::InvalidVersion`] if its content is not a usable
    /// version.
    pub fn read(path: &Utf8Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                PackagerError::VersionFileNotFound {
                    path: path.to_owned(),
                }
            } else {
                PackagerError::ReadFailed {
                    path: path.to_owned(),
                    source,
                }
            }
        })?;
        Self::try_from(contents.as_str())
    }

    /// Return the version as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for VersionTag {
    type Error = PackagerError;

    fn try_from(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let reject = |reason: &str| PackagerError::InvalidVersion {
            value: trimmed.to_owned(),
            reason: reason.to_owned(),
        };

        if trimmed.is_empty() {
            return Err(reject("version is empty"));
        }
        if trimmed == "." || trimmed == ".." {
            return Err(reject("version cannot be a relative path component"));
        }
        if trimmed
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '\\' | ':'))
        {
            return Err(reject(
                "version must not contain whitespace, control characters, or path separators",
            ));
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for VersionTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
