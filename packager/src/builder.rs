//! Compiler invocation for the EasyJS toolchain binary.
//!
//! A build only counts as successful when the compiler exits zero *and* the
//! binary it was asked for exists afterwards. The [`Builder`] performs both
//! checks; the [`Compiler`] trait is the process boundary so tests can
//! substitute a stub.

use crate::error::{PackagerError, Result};
use crate::target::TargetTriple;
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use std::process::{Command, Output};

/// Compiler optimisation profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Unoptimised build (`target/debug`).
    #[default]
    Debug,
    /// Optimised build (`target/release`).
    Release,
}

impl BuildMode {
    /// Select the mode from a `--release` flag.
    #[must_use]
    pub const fn from_release_flag(release: bool) -> Self {
        if release { Self::Release } else { Self::Debug }
    }

    /// The profile directory cargo writes into.
    #[must_use]
    pub const fn profile_dir(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.profile_dir())
    }
}

/// A single compiler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    /// Directory the compiler runs in.
    pub workspace_root: Utf8PathBuf,
    /// Compiler output directory.
    pub build_root: Utf8PathBuf,
    /// Cross-compilation target, or `None` for the host.
    pub target: Option<TargetTriple>,
    /// Optimisation profile.
    pub mode: BuildMode,
    /// Name of the binary the build must produce.
    pub binary_name: String,
}

impl CompileRequest {
    /// Arguments passed to `cargo`.
    #[must_use]
    pub fn cargo_args(&self) -> Vec<String> {
        let mut args = vec!["build".to_owned()];
        if self.mode == BuildMode::Release {
            args.push("--release".to_owned());
        }
        if let Some(target) = &self.target {
            args.push("--target".to_owned());
            args.push(target.as_str().to_owned());
        }
        args
    }

    /// Where the compiler writes the binary for this request.
    ///
    /// Cross builds land in `<build_root>/<triple>/<profile>/` and carry the
    /// target's executable suffix; host builds use `<build_root>/<profile>/`
    /// and the host suffix.
    #[must_use]
    pub fn expected_binary(&self) -> Utf8PathBuf {
        match &self.target {
            Some(target) => self
                .build_root
                .join(target.as_str())
                .join(self.mode.profile_dir())
                .join(format!("{}{}", self.binary_name, target.executable_suffix())),
            None => self.build_root.join(self.mode.profile_dir()).join(format!(
                "{}{}",
                self.binary_name,
                std::env::consts::EXE_SUFFIX
            )),
        }
    }

    /// Label used in progress output and errors.
    #[must_use]
    pub fn target_label(&self) -> String {
        self.target
            .as_ref()
            .map_or_else(|| "host".to_owned(), ToString::to_string)
    }
}

/// Abstraction over the external compiler process.
#[cfg_attr(test, mockall::automock)]
pub trait Compiler {
    /// Run the compiler to completion and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the process cannot be started.
    fn compile(&self, request: &CompileRequest) -> std::io::Result<Output>;
}

/// Runs `cargo build` as a child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct CargoCompiler;

impl Compiler for CargoCompiler {
    fn compile(&self, request: &CompileRequest) -> std::io::Result<Output> {
        Command::new("cargo")
            .args(request.cargo_args())
            .current_dir(&request.workspace_root)
            .env("CARGO_TARGET_DIR", &request.build_root)
            .output()
    }
}

/// A verified compiler output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    /// The target that was built, or `None` for the host.
    pub target: Option<TargetTriple>,
    /// Path to the binary, checked to exist.
    pub binary_path: Utf8PathBuf,
}

/// Drives a [`Compiler`] and verifies what it produced.
pub struct Builder<'a> {
    compiler: &'a dyn Compiler,
}

impl<'a> Builder<'a> {
    /// Create a builder over `compiler`.
    #[must_use]
    pub fn new(compiler: &'a dyn Compiler) -> Self {
        Self { compiler }
    }

    /// Compile `request` and confirm the expected binary exists.
    ///
    /// Any binary already at the expected path is removed first.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::CompilerLaunch`] if the compiler cannot be
    /// started, [`PackagerError::CompileFailed`] with the captured stderr on a
    /// non-zero exit, and [`PackagerError::ArtifactMissing`] when the compiler
    /// exits zero without producing the binary. A stale binary that cannot be
    /// removed is reported as [`PackagerError::WriteFailed`].
    pub fn build(&self, request: &CompileRequest) -> Result<BuildResult> {
        let label = request.target_label();
        log::debug!(
            "running cargo {} in {} for {label}",
            request.cargo_args().join(" "),
            request.workspace_root
        );

        let binary_path = request.expected_binary();
        discard_stale_binary(&binary_path)?;

        let output = self
            .compiler
            .compile(request)
            .map_err(|source| PackagerError::CompilerLaunch {
                program: "cargo".to_owned(),
                source,
            })?;

        if !output.status.success() {
            return Err(PackagerError::CompileFailed {
                target: label,
                status: describe_status(&output),
                stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_owned(),
            });
        }

        if !binary_path.is_file() {
            return Err(PackagerError::ArtifactMissing {
                target: label,
                path: binary_path,
            });
        }

        log::debug!("compiler produced {binary_path}");
        Ok(BuildResult {
            target: request.target.clone(),
            binary_path,
        })
    }
}

/// Remove a binary left in the build root by an earlier run, so only a file
/// written by this compile can satisfy the artifact check.
fn discard_stale_binary(path: &Utf8Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            log::debug!("removed stale binary {path}");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(PackagerError::WriteFailed {
            path: path.to_owned(),
            source,
        }),
    }
}

fn describe_status(output: &Output) -> String {
    output.status.code().map_or_else(
        || "terminated by signal".to_owned(),
        |code| format!("exit code {code}"),
    )
}
