//! Release pipeline orchestration.
//!
//! A release run takes the release lock, regenerates the standard library
//! module, discards any previous release of the same version, then builds,
//! verifies, and stages each target strictly in order. The first failure
//! aborts the run; targets after it are never compiled. A manifest is written
//! only once every target has been staged.

use crate::builder::{BuildMode, Builder, CompileRequest, Compiler};
use crate::config::ReleaseConfig;
use crate::embedder::embed_std;
use crate::error::Result;
use crate::lock::ReleaseLock;
use crate::manifest::ReleaseManifest;
use crate::output::{DryRunInfo, embed_summary, success_message, write_stderr_line};
use crate::stager::{ReleaseArtifact, Stager};
use crate::version::VersionTag;
use camino::{Utf8Path, Utf8PathBuf};
use std::io::Write;

/// Context for a release run.
#[derive(Debug)]
pub struct ReleaseContext<'a> {
    /// Workspace root the compiler runs in.
    pub workspace_root: &'a Utf8Path,
    /// Resolved release configuration.
    pub config: &'a ReleaseConfig,
    /// Version the release is published under.
    pub version: &'a VersionTag,
    /// Suppress progress output.
    pub quiet: bool,
}

impl ReleaseContext<'_> {
    fn stager(&self) -> Stager {
        Stager::new(self.config.release_dir.clone(), self.version.clone())
    }

    fn progress(&self, stderr: &mut dyn Write, message: impl std::fmt::Display) {
        if !self.quiet {
            write_stderr_line(stderr, message);
        }
    }

    /// Describe what a run would do without doing it.
    #[must_use]
    pub fn dry_run_text(&self) -> String {
        let release_path = self.stager().version_dir();
        DryRunInfo {
            workspace_root: self.workspace_root,
            version: self.version,
            binary_name: &self.config.binary_name,
            build_root: &self.config.build_root,
            release_path: &release_path,
            targets: &self.config.targets,
        }
        .display_text()
    }
}

/// What a successful release produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOutcome {
    /// The version directory, e.g. `releases/v0.4.5`.
    pub release_path: Utf8PathBuf,
    /// One staged binary per target, in processing order.
    pub artifacts: Vec<ReleaseArtifact>,
    /// Path to the written `manifest.json`.
    pub manifest_path: Utf8PathBuf,
}

/// Pick the release version: an explicit override, or the library version
/// marker named in the configuration.
///
/// # Errors
///
/// Returns [`crate::error::PackagerError::InvalidVersion`] for an unusable
/// override, or any error from [`VersionTag::read`].
pub fn release_version(config: &ReleaseConfig, explicit: Option<&str>) -> Result<VersionTag> {
    match explicit {
        Some(value) => VersionTag::try_from(value),
        None => VersionTag::read(&config.stdlib.version_file),
    }
}

/// Run a full release.
///
/// # Errors
///
/// Returns the first failure encountered: a held lock, an embedder error, a
/// compiler failure with its captured stderr, a missing artifact, or an I/O
/// error while staging or writing the manifest.
pub fn run_release(
    context: &ReleaseContext<'_>,
    compiler: &dyn Compiler,
    stderr: &mut dyn Write,
) -> Result<ReleaseOutcome> {
    let config = context.config;
    let _lock = ReleaseLock::acquire(&config.release_dir)?;

    context.progress(stderr, "Embedding standard library...");
    let report = embed_std(&config.stdlib)?;
    context.progress(stderr, embed_summary(&report));

    let stager = context.stager();
    if stager.discard_previous()? {
        context.progress(
            stderr,
            format!("Removed previous release at {}", stager.version_dir()),
        );
    }

    let builder = Builder::new(compiler);
    let total = config.targets.len();
    let mut artifacts = Vec::with_capacity(total);

    for (index, target) in config.targets.iter().enumerate() {
        context.progress(
            stderr,
            format!("[{}/{total}] Building {target}...", index + 1),
        );

        let request = CompileRequest {
            workspace_root: context.workspace_root.to_owned(),
            build_root: config.build_root.clone(),
            target: Some(target.triple().clone()),
            mode: BuildMode::Release,
            binary_name: config.binary_name.clone(),
        };
        let build = builder.build(&request)?;
        let artifact = stager.stage(target, &config.binary_name, &build)?;

        context.progress(stderr, format!("  -> {}", artifact.path));
        artifacts.push(artifact);
    }

    let release_path = stager.version_dir();
    let manifest = ReleaseManifest::new(context.version, &config.binary_name, &artifacts)?;
    let manifest_path = manifest.write(&release_path)?;

    context.progress(stderr, "");
    context.progress(stderr, success_message(artifacts.len(), &release_path));

    Ok(ReleaseOutcome {
        release_path,
        artifacts,
        manifest_path,
    })
}
