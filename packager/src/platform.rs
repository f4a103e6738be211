//! Host platform names accepted by the build front-end.
//!
//! Users may name a platform by its canonical token (`windows`, `linux`,
//! `mac`) or by a common alias such as a distribution or kernel name.

use crate::error::{PackagerError, Result};
use crate::target::TargetTriple;
use std::fmt;
use std::str::FromStr;

/// A platform the front-end can build for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Microsoft Windows.
    Windows,
    /// Linux and other Unix-like systems without a dedicated entry.
    Linux,
    /// Apple macOS.
    Mac,
}

/// Static alias table, matched case-insensitively.
const PLATFORM_ALIASES: &[(&str, Platform)] = &[
    ("windows", Platform::Windows),
    ("win", Platform::Windows),
    ("win32", Platform::Windows),
    ("win64", Platform::Windows),
    ("linux", Platform::Linux),
    ("ubuntu", Platform::Linux),
    ("debian", Platform::Linux),
    ("fedora", Platform::Linux),
    ("arch", Platform::Linux),
    ("mac", Platform::Mac),
    ("macos", Platform::Mac),
    ("osx", Platform::Mac),
    ("darwin", Platform::Mac),
];

impl Platform {
    /// Resolve a user-supplied token through the alias table.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::UnknownPlatform`] for tokens not in the table.
    ///
    /// # Examples
    ///
    /// ```
    /// use easyjs_packager::platform::Platform;
    ///
    /// assert_eq!(Platform::resolve("Ubuntu").ok(), Some(Platform::Linux));
    /// assert_eq!(Platform::resolve("darwin").ok(), Some(Platform::Mac));
    /// assert!(Platform::resolve("beos").is_err());
    /// ```
    pub fn resolve(token: &str) -> Result<Self> {
        let lowered = token.trim().to_ascii_lowercase();
        PLATFORM_ALIASES
            .iter()
            .find(|(alias, _)| *alias == lowered)
            .map(|(_, platform)| *platform)
            .ok_or_else(|| PackagerError::UnknownPlatform {
                value: token.to_owned(),
                expected: Self::accepted_tokens().join(", "),
            })
    }

    /// The platform this program is running on.
    #[must_use]
    pub fn host() -> Self {
        match std::env::consts::OS {
            "windows" => Self::Windows,
            "macos" => Self::Mac,
            _ => Self::Linux,
        }
    }

    /// Every token accepted by [`Platform::resolve`].
    #[must_use]
    pub fn accepted_tokens() -> Vec<&'static str> {
        PLATFORM_ALIASES.iter().map(|(alias, _)| *alias).collect()
    }

    /// The canonical token for this platform.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Linux => "linux",
            Self::Mac => "mac",
        }
    }

    /// The x86-64 target triple released for this platform.
    #[must_use]
    pub fn default_triple(self) -> TargetTriple {
        let triple = match self {
            Self::Windows => "x86_64-pc-windows-gnu",
            Self::Linux => "x86_64-unknown-linux-gnu",
            Self::Mac => "x86_64-apple-darwin",
        };
        TargetTriple::known(triple)
    }
}

impl FromStr for Platform {
    type Err = PackagerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::resolve(s)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
