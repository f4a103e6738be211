//! Release targets: platform names paired with compiler target triples.
//!
//! A [`ReleaseTarget`] is static configuration. Both halves are validated at
//! construction so the rest of the pipeline can use them as path components
//! and compiler arguments without further checks.

use crate::error::{PackagerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A compiler target triple such as `x86_64-unknown-linux-gnu`.
///
/// Any well-formed triple is accepted: at least three hyphen-separated,
/// non-empty components made of lowercase ASCII letters, digits, `_`, and `.`.
///
/// # Examples
///
/// ```
/// use easyjs_packager::target::TargetTriple;
///
/// let triple: TargetTriple = "x86_64-pc-windows-gnu"
///     .try_into()
///     .expect("valid target triple");
/// assert_eq!(triple.executable_suffix(), ".exe");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TargetTriple(String);

impl TargetTriple {
    /// Wrap a triple literal that is known to be well-formed.
    pub(crate) fn known(value: &'static str) -> Self {
        debug_assert!(Self::try_from(value).is_ok(), "malformed triple {value}");
        Self(value.to_owned())
    }

    /// Return the triple as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the executable filename suffix for this target.
    ///
    /// Unlike [`std::env::consts::EXE_SUFFIX`], which describes the host,
    /// this inspects the triple so it is correct when cross-compiling.
    #[must_use]
    pub fn executable_suffix(&self) -> &'static str {
        if self.is_windows() { ".exe" } else { "" }
    }

    /// Whether this target is a Windows platform.
    #[must_use]
    pub fn is_windows(&self) -> bool {
        self.0.contains("windows")
    }
}

impl TryFrom<&str> for TargetTriple {
    type Error = PackagerError;

    fn try_from(value: &str) -> Result<Self> {
        let reject = |reason: &str| PackagerError::InvalidTarget {
            value: value.to_owned(),
            reason: reason.to_owned(),
        };

        let components: Vec<&str> = value.split('-').collect();
        if components.len() < 3 {
            return Err(reject(
                "expected at least three components (arch-vendor-os[-env])",
            ));
        }
        if components.iter().any(|c| c.is_empty()) {
            return Err(reject("components must not be empty"));
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.'))
        {
            return Err(reject(
                "only lowercase ASCII letters, digits, '_', '.', and '-' are allowed",
            ));
        }
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for TargetTriple {
    type Error = PackagerError;

    fn try_from(value: String) -> Result<Self> {
        Self::try_from(value.as_str())
    }
}

impl From<TargetTriple> for String {
    fn from(value: TargetTriple) -> Self {
        value.0
    }
}

impl AsRef<str> for TargetTriple {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The directory name a target's binary is released under, e.g. `macos`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlatformName(String);

impl PlatformName {
    /// Wrap a platform literal that is known to be valid.
    pub(crate) fn known(value: &'static str) -> Self {
        debug_assert!(Self::try_from(value).is_ok(), "invalid platform {value}");
        Self(value.to_owned())
    }

    /// Return the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for PlatformName {
    type Error = PackagerError;

    fn try_from(value: &str) -> Result<Self> {
        let reject = |reason: &str| PackagerError::InvalidPlatformName {
            value: value.to_owned(),
            reason: reason.to_owned(),
        };

        if value.is_empty() {
            return Err(reject("name is empty"));
        }
        if value.starts_with('.') {
            return Err(reject("name must not start with '.'"));
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(reject(
                "only ASCII letters, digits, '-', '_', and '.' are allowed",
            ));
        }
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for PlatformName {
    type Error = PackagerError;

    fn try_from(value: String) -> Result<Self> {
        Self::try_from(value.as_str())
    }
}

impl From<PlatformName> for String {
    fn from(value: PlatformName) -> Self {
        value.0
    }
}

impl fmt::Display for PlatformName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the release matrix.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReleaseTarget {
    platform: PlatformName,
    triple: TargetTriple,
}

impl ReleaseTarget {
    /// Pair a platform name with the triple it is built for.
    #[must_use]
    pub fn new(platform: PlatformName, triple: TargetTriple) -> Self {
        Self { platform, triple }
    }

    /// The release directory name.
    #[must_use]
    pub fn platform(&self) -> &PlatformName {
        &self.platform
    }

    /// The compiler target triple.
    #[must_use]
    pub fn triple(&self) -> &TargetTriple {
        &self.triple
    }

    /// The released binary's filename for `binary_name`.
    #[must_use]
    pub fn binary_filename(&self, binary_name: &str) -> String {
        format!("{binary_name}{}", self.triple.executable_suffix())
    }
}

impl fmt::Display for ReleaseTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.platform, self.triple)
    }
}
