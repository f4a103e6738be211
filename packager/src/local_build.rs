//! The developer build behind `easyjs-build build`.
//!
//! Regenerates the standard library module and compiles the toolchain once.
//! Building for the host platform uses cargo's default target; naming another
//! platform cross-compiles for its x86-64 triple. With `--install` the
//! verified binary is also copied into `<workspace>/bin/`.

use crate::builder::{BuildMode, BuildResult, Builder, CompileRequest, Compiler};
use crate::config::ReleaseConfig;
use crate::embedder::embed_std;
use crate::error::{PackagerError, Result};
use crate::output::{embed_summary, write_stderr_line};
use crate::platform::Platform;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io::Write;

/// Directory, relative to the workspace root, that `--install` copies into.
pub const INSTALL_DIR: &str = "bin";

/// Parameters for one local build.
#[derive(Debug)]
pub struct LocalBuild<'a> {
    /// Workspace root the compiler runs in.
    pub workspace_root: &'a Utf8Path,
    /// Resolved configuration; only the binary name, build root, and
    /// standard library settings are used.
    pub config: &'a ReleaseConfig,
    /// Platform to build for.
    pub platform: Platform,
    /// Optimisation profile.
    pub mode: BuildMode,
    /// Suppress progress output.
    pub quiet: bool,
    /// Copy the verified binary into [`INSTALL_DIR`].
    pub install: bool,
}

impl LocalBuild<'_> {
    /// The compiler request this build issues.
    #[must_use]
    pub fn request(&self) -> CompileRequest {
        let target = (self.platform != Platform::host()).then(|| self.platform.default_triple());
        CompileRequest {
            workspace_root: self.workspace_root.to_owned(),
            build_root: self.config.build_root.clone(),
            target,
            mode: self.mode,
            binary_name: self.config.binary_name.clone(),
        }
    }
}

/// Embed the standard library and compile once.
///
/// # Errors
///
/// Returns any embedder error, or the compiler failure or missing artifact
/// reported by [`Builder::build`].
pub fn run_local_build(
    build: &LocalBuild<'_>,
    compiler: &dyn Compiler,
    stderr: &mut dyn Write,
) -> Result<BuildResult> {
    let report = embed_std(&build.config.stdlib)?;
    if !build.quiet {
        write_stderr_line(stderr, embed_summary(&report));
        write_stderr_line(
            stderr,
            format!("Building {} ({} mode)...", build.platform, build.mode),
        );
    }

    let result = Builder::new(compiler).build(&build.request())?;

    if !build.quiet {
        write_stderr_line(stderr, format!("Built {}", result.binary_path));
    }
    if build.install {
        let installed = install_binary(build.workspace_root, &result)?;
        if !build.quiet {
            write_stderr_line(stderr, format!("Installed {installed}"));
        }
    }
    Ok(result)
}

/// Copy a verified binary into `<workspace_root>/bin/`, keeping its filename
/// and permission bits. An existing copy is replaced.
///
/// # Errors
///
/// Returns [`PackagerError::Io`] if the directory cannot be created and
/// [`PackagerError::CopyFailed`] if the copy fails.
pub fn install_binary(workspace_root: &Utf8Path, build: &BuildResult) -> Result<Utf8PathBuf> {
    let dir = workspace_root.join(INSTALL_DIR);
    fs::create_dir_all(&dir)?;

    let filename = build.binary_path.file_name().unwrap_or_default();
    let dest = dir.join(filename);
    fs::copy(&build.binary_path, &dest).map_err(|source| PackagerError::CopyFailed {
        from: build.binary_path.clone(),
        to: dest.clone(),
        source,
    })?;

    log::info!("installed {dest}");
    Ok(dest)
}
