//! Error types for the EasyJS packager.
//!
//! Every variant is fatal to the run that produced it. Each one belongs to a
//! single [`ErrorCategory`] so the binaries can report failures uniformly and
//! tests can assert on the class of failure rather than on message text.

use camino::Utf8PathBuf;
use std::fmt;
use thiserror::Error;

/// Broad classes of failure surfaced by the packager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing or invalid inputs: version marker, source directory,
    /// configuration, module set.
    Configuration,
    /// A file could not be read, written, or copied.
    Io,
    /// The compiler could not be launched or exited unsuccessfully.
    ProcessFailure,
    /// The compiler reported success but the expected binary is absent.
    ArtifactMissing,
    /// The user supplied an unrecognised command, flag, or platform.
    UserInput,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Configuration => "configuration error",
            Self::Io => "I/O error",
            Self::ProcessFailure => "process failure",
            Self::ArtifactMissing => "artifact missing",
            Self::UserInput => "invalid input",
        };
        f.write_str(label)
    }
}

/// Errors that can occur while embedding the standard library or packaging a
/// release.
#[derive(Debug, Error)]
pub enum PackagerError {
    /// The version marker file does not exist.
    #[error("version file not found at {path}")]
    VersionFileNotFound {
        /// Path where the version marker was expected.
        path: Utf8PathBuf,
    },

    /// A version string is blank or cannot be used as a directory name.
    #[error("invalid version {value:?}: {reason}")]
    InvalidVersion {
        /// The rejected version text.
        value: String,
        /// Why the version was rejected.
        reason: String,
    },

    /// The library source directory does not exist.
    #[error("library source directory not found at {path}")]
    SourceDirNotFound {
        /// Path where the directory was expected.
        path: Utf8PathBuf,
    },

    /// The library source directory holds no module files.
    #[error("no .{extension} modules found in {dir}; a toolchain without a standard library is invalid")]
    NoModules {
        /// Directory that was scanned.
        dir: Utf8PathBuf,
        /// Extension that module files must carry.
        extension: String,
    },

    /// Two module files normalise to the same generated identifier.
    #[error("modules {first} and {second} both map to identifier {identifier}")]
    DuplicateModule {
        /// The colliding identifier.
        identifier: String,
        /// The module file that claimed the identifier first.
        first: Utf8PathBuf,
        /// The module file that collided with it.
        second: Utf8PathBuf,
    },

    /// The committed generated module differs from a fresh generation.
    #[error("generated module {path} is out of date; run easyjs-embed-std")]
    StaleModule {
        /// Path to the stale generated module.
        path: Utf8PathBuf,
    },

    /// The release configuration file could not be parsed or is invalid.
    #[error("invalid release configuration at {path}: {reason}")]
    InvalidConfig {
        /// Path to the configuration file.
        path: Utf8PathBuf,
        /// Description of the problem.
        reason: String,
    },

    /// A target triple is malformed.
    #[error("invalid target triple {value:?}: {reason}")]
    InvalidTarget {
        /// The rejected triple.
        value: String,
        /// Why the triple was rejected.
        reason: String,
    },

    /// A release platform name cannot be used as a directory name.
    #[error("invalid platform name {value:?}: {reason}")]
    InvalidPlatformName {
        /// The rejected platform name.
        value: String,
        /// Why the name was rejected.
        reason: String,
    },

    /// The workspace root could not be found.
    #[error("workspace not found: {reason}")]
    WorkspaceNotFound {
        /// Description of why the workspace was not found.
        reason: String,
    },

    /// A file could not be read.
    #[error("failed to read {path}")]
    ReadFailed {
        /// The file that could not be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A file could not be written.
    #[error("failed to write {path}")]
    WriteFailed {
        /// The file that could not be written.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A built binary could not be copied into the release tree.
    #[error("failed to copy {from} to {to}")]
    CopyFailed {
        /// Source binary.
        from: Utf8PathBuf,
        /// Destination inside the release tree.
        to: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The release manifest could not be serialised.
    #[error("manifest serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The compiler process could not be started.
    #[error("failed to launch {program}")]
    CompilerLaunch {
        /// The program that could not be started.
        program: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The compiler exited unsuccessfully.
    #[error("compilation failed for {target} ({status}):\n{stderr}")]
    CompileFailed {
        /// The target being compiled.
        target: String,
        /// Human-readable exit status.
        status: String,
        /// Captured compiler stderr.
        stderr: String,
    },

    /// The compiler exited successfully but produced no binary.
    #[error("compiler reported success for {target} but {path} does not exist")]
    ArtifactMissing {
        /// The target being compiled.
        target: String,
        /// Where the binary was expected.
        path: Utf8PathBuf,
    },

    /// Another release run holds the release lock.
    #[error("another release is in progress (lock held on {path})")]
    ReleaseLocked {
        /// Path to the lock file.
        path: Utf8PathBuf,
    },

    /// A platform token is not in the alias table.
    #[error("unknown platform {value:?}; expected one of: {expected}")]
    UnknownPlatform {
        /// The rejected token.
        value: String,
        /// Comma-separated list of accepted tokens.
        expected: String,
    },
}

impl PackagerError {
    /// Return the failure class this error belongs to.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::VersionFileNotFound { .. }
            | Self::InvalidVersion { .. }
            | Self::SourceDirNotFound { .. }
            | Self::NoModules { .. }
            | Self::DuplicateModule { .. }
            | Self::StaleModule { .. }
            | Self::InvalidConfig { .. }
            | Self::InvalidTarget { .. }
            | Self::InvalidPlatformName { .. }
            | Self::WorkspaceNotFound { .. }
            | Self::ReleaseLocked { .. } => ErrorCategory::Configuration,
            Self::ReadFailed { .. }
            | Self::WriteFailed { .. }
            | Self::CopyFailed { .. }
            | Self::Io(_)
            | Self::Serialization(_) => ErrorCategory::Io,
            Self::CompilerLaunch { .. } | Self::CompileFailed { .. } => {
                ErrorCategory::ProcessFailure
            }
            Self::ArtifactMissing { .. } => ErrorCategory::ArtifactMissing,
            Self::UnknownPlatform { .. } => ErrorCategory::UserInput,
        }
    }
}

/// Result type alias using [`PackagerError`].
pub type Result<T> = std::result::Result<T, PackagerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn compile_failed_includes_target_and_stderr() {
        let err = PackagerError::CompileFailed {
            target: "x86_64-apple-darwin".to_owned(),
            status: "exit code 101".to_owned(),
            stderr: "error: linker `cc` not found".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("x86_64-apple-darwin"));
        assert!(msg.contains("exit code 101"));
        assert!(msg.contains("linker `cc` not found"));
    }

    #[test]
    fn read_failed_preserves_source() {
        let err = PackagerError::ReadFailed {
            path: Utf8PathBuf::from("lib/io.ej"),
            source: std::io::Error::other("permission denied"),
        };
        assert!(err.to_string().contains("lib/io.ej"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn no_modules_names_directory_and_extension() {
        let err = PackagerError::NoModules {
            dir: Utf8PathBuf::from("lib"),
            extension: "ej".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains(".ej"));
        assert!(msg.contains("lib"));
    }

    #[rstest]
    #[case::version(
        PackagerError::VersionFileNotFound { path: Utf8PathBuf::from("lib/version") },
        ErrorCategory::Configuration
    )]
    #[case::no_modules(
        PackagerError::NoModules { dir: Utf8PathBuf::from("lib"), extension: "ej".to_owned() },
        ErrorCategory::Configuration
    )]
    #[case::read(
        PackagerError::ReadFailed {
            path: Utf8PathBuf::from("lib/io.ej"),
            source: std::io::Error::other("boom"),
        },
        ErrorCategory::Io
    )]
    #[case::compile(
        PackagerError::CompileFailed {
            target: "host".to_owned(),
            status: "exit code 1".to_owned(),
            stderr: String::new(),
        },
        ErrorCategory::ProcessFailure
    )]
    #[case::missing(
        PackagerError::ArtifactMissing {
            target: "host".to_owned(),
            path: Utf8PathBuf::from("target/release/easyjs"),
        },
        ErrorCategory::ArtifactMissing
    )]
    #[case::platform(
        PackagerError::UnknownPlatform { value: "beos".to_owned(), expected: "linux".to_owned() },
        ErrorCategory::UserInput
    )]
    fn errors_map_to_categories(#[case] err: PackagerError, #[case] expected: ErrorCategory) {
        assert_eq!(err.category(), expected);
    }
}
