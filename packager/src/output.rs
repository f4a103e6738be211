//! User-facing progress text for the packager binaries.
//!
//! Everything here formats strings or writes them to a caller-supplied
//! handle, so the binaries and tests can capture output in a `Vec<u8>`.

use crate::embedder::EmbedReport;
use crate::error::Result;
use crate::target::ReleaseTarget;
use crate::version::VersionTag;
use camino::Utf8Path;
use std::io::Write;

/// Write one line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort progress output; nothing useful to do on failure.
    }
}

/// Report the outcome of a binary's `run` and return its exit code.
///
/// Errors are printed with their category and each underlying cause.
pub fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error ({}): {err}", err.category()));
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                write_stderr_line(stderr, format!("  caused by: {cause}"));
                source = cause.source();
            }
            1
        }
    }
}

/// Format the closing message of a successful release.
#[must_use]
pub fn success_message(count: usize, release_path: &Utf8Path) -> String {
    let plural = if count == 1 { "binary" } else { "binaries" };
    format!("Released {count} {plural} to {release_path}")
}

/// Format the result of an embedder run.
#[must_use]
pub fn embed_summary(report: &EmbedReport) -> String {
    let plural = if report.modules.len() == 1 { "module" } else { "modules" };
    let state = if report.changed { "wrote" } else { "unchanged" };
    format!(
        "Embedded {} {plural} from standard library {} ({state} {})",
        report.modules.len(),
        report.version,
        report.output
    )
}

/// The plan printed by `easyjs-release --dry-run`.
///
/// # Example
///
/// ```
/// use camino::Utf8PathBuf;
/// use easyjs_packager::config::ReleaseConfig;
/// use easyjs_packager::output::DryRunInfo;
/// use easyjs_packager::version::VersionTag;
///
/// let config = ReleaseConfig::default();
/// let version = VersionTag::try_from("v0.4.5").expect("valid version");
/// let workspace = Utf8PathBuf::from("/src/easyjs");
/// let release_path = Utf8PathBuf::from("/src/easyjs/releases/v0.4.5");
///
/// let info = DryRunInfo {
///     workspace_root: &workspace,
///     version: &version,
///     binary_name: &config.binary_name,
///     build_root: &config.build_root,
///     release_path: &release_path,
///     targets: &config.targets,
/// };
///
/// let text = info.display_text();
/// assert!(text.contains("Dry run"));
/// assert!(text.contains("x86_64-apple-darwin"));
/// ```
#[derive(Debug)]
pub struct DryRunInfo<'a> {
    /// Path to the workspace root.
    pub workspace_root: &'a Utf8Path,
    /// Version being released.
    pub version: &'a VersionTag,
    /// Name of the binary being released.
    pub binary_name: &'a str,
    /// Compiler output directory.
    pub build_root: &'a Utf8Path,
    /// Directory the release would be written to.
    pub release_path: &'a Utf8Path,
    /// Targets in processing order.
    pub targets: &'a [ReleaseTarget],
}

impl DryRunInfo<'_> {
    /// Format the dry-run information for display.
    #[must_use]
    pub fn display_text(&self) -> String {
        let mut lines = vec![
            "Dry run - nothing will be compiled or written".to_owned(),
            String::new(),
            format!("Workspace root: {}", self.workspace_root),
            format!("Version: {}", self.version),
            format!("Binary: {}", self.binary_name),
            format!("Build root: {}", self.build_root),
            format!("Release path: {}", self.release_path),
            String::new(),
            "Targets:".to_owned(),
        ];
        for target in self.targets {
            lines.push(format!(
                "  - {target} -> {}/{}",
                target.platform(),
                target.binary_filename(self.binary_name)
            ));
        }
        lines.join("\n")
    }
}
