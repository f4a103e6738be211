//! Release configuration loaded from `release.toml`.
//!
//! The file is optional. Every field falls back to the layout the EasyJS
//! repository uses (`lib/` for the standard library, `releases/` for output,
//! and the Windows, macOS, and Linux x86-64 targets), so a missing file and
//! an empty file behave identically. Relative paths are resolved against the
//! workspace root by [`ReleaseConfig::resolved`].

use crate::error::{PackagerError, Result};
use crate::target::{PlatformName, ReleaseTarget, TargetTriple};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::collections::BTreeSet;

/// Conventional configuration filename at the workspace root.
pub const CONFIG_FILENAME: &str = "release.toml";

/// Settings for the standard library embedder.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StdlibConfig {
    /// Directory holding one file per library module.
    pub source_dir: Utf8PathBuf,
    /// Plain text file holding the library version.
    pub version_file: Utf8PathBuf,
    /// Extension (without the dot) that marks a module file.
    pub extension: String,
    /// Generated Rust module that is overwritten on every run.
    pub output: Utf8PathBuf,
}

impl StdlibConfig {
    /// Return a copy with every relative path anchored at `root`.
    #[must_use]
    pub fn resolved(&self, root: &Utf8Path) -> Self {
        Self {
            source_dir: anchor(root, &self.source_dir),
            version_file: anchor(root, &self.version_file),
            extension: self.extension.clone(),
            output: anchor(root, &self.output),
        }
    }
}

impl Default for StdlibConfig {
    fn default() -> Self {
        Self {
            source_dir: Utf8PathBuf::from("lib"),
            version_file: Utf8PathBuf::from("lib/version"),
            extension: "ej".to_owned(),
            output: Utf8PathBuf::from("src/generated.rs"),
        }
    }
}

/// Complete configuration for a release run.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ReleaseConfig {
    /// Name of the toolchain binary produced by the compiler.
    pub binary_name: String,
    /// Root of the versioned release tree.
    pub release_dir: Utf8PathBuf,
    /// Compiler output directory (`CARGO_TARGET_DIR`).
    pub build_root: Utf8PathBuf,
    /// Standard library embedding settings.
    pub stdlib: StdlibConfig,
    /// Platforms to build, in processing order.
    pub targets: Vec<ReleaseTarget>,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            binary_name: "easyjs".to_owned(),
            release_dir: Utf8PathBuf::from("releases"),
            build_root: Utf8PathBuf::from("target"),
            stdlib: StdlibConfig::default(),
            targets: default_targets(),
        }
    }
}

/// The platforms released when no target list is configured.
fn default_targets() -> Vec<ReleaseTarget> {
    [
        ("windows-x64", "x86_64-pc-windows-gnu"),
        ("macos", "x86_64-apple-darwin"),
        ("linux", "x86_64-unknown-linux-gnu"),
    ]
    .into_iter()
    .map(|(platform, triple)| {
        ReleaseTarget::new(PlatformName::known(platform), TargetTriple::known(triple))
    })
    .collect()
}

impl ReleaseConfig {
    /// Load the configuration for `workspace_root`.
    ///
    /// When `explicit` is given it must exist. Otherwise
    /// `<workspace_root>/release.toml` is used if present, and the defaults
    /// apply if it is not. The result is validated and resolved against the
    /// workspace root.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::InvalidConfig`] if the file cannot be read or
    /// parsed, or fails validation.
    pub fn load(workspace_root: &Utf8Path, explicit: Option<&Utf8Path>) -> Result<Self> {
        let path = explicit.map_or_else(
            || workspace_root.join(CONFIG_FILENAME),
            |p| anchor(workspace_root, p),
        );

        let config = if explicit.is_some() || path.is_file() {
            let contents =
                std::fs::read_to_string(&path).map_err(|e| PackagerError::InvalidConfig {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
            Self::from_toml_str(&contents, &path)?
        } else {
            log::debug!("no {CONFIG_FILENAME} at {workspace_root}; using defaults");
            Self::default()
        };

        Ok(config.resolved(workspace_root))
    }

    /// Parse and validate configuration text read from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::InvalidConfig`] on malformed TOML, unknown
    /// keys, or invalid values.
    pub fn from_toml_str(contents: &str, path: &Utf8Path) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(|e| PackagerError::InvalidConfig {
            path: path.to_owned(),
            reason: e.to_string(),
        })?;
        config.validate().map_err(|reason| PackagerError::InvalidConfig {
            path: path.to_owned(),
            reason,
        })?;
        Ok(config)
    }

    /// Return a copy with every relative path anchored at `root`.
    #[must_use]
    pub fn resolved(&self, root: &Utf8Path) -> Self {
        Self {
            binary_name: self.binary_name.clone(),
            release_dir: anchor(root, &self.release_dir),
            build_root: anchor(root, &self.build_root),
            stdlib: self.stdlib.resolved(root),
            targets: self.targets.clone(),
        }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        let name = self.binary_name.trim();
        if name.is_empty() {
            return Err("binary_name must not be empty".to_owned());
        }
        if name.contains(['/', '\\']) {
            return Err(format!("binary_name {name:?} must not contain path separators"));
        }
        if self.stdlib.extension.is_empty() || self.stdlib.extension.starts_with('.') {
            return Err("stdlib.extension must be non-empty and given without a leading dot".to_owned());
        }
        if self.targets.is_empty() {
            return Err("at least one target must be configured".to_owned());
        }

        let mut seen = BTreeSet::new();
        for target in &self.targets {
            if !seen.insert(target.platform().as_str()) {
                return Err(format!(
                    "platform {} is configured more than once",
                    target.platform()
                ));
            }
        }
        Ok(())
    }
}

fn anchor(root: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        path.to_owned()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(source: &str) -> Result<ReleaseConfig> {
        ReleaseConfig::from_toml_str(source, Utf8Path::new("release.toml"))
    }

    #[rstest]
    fn defaults_match_repository_layout() {
        let config = ReleaseConfig::default();

        assert_eq!(config.binary_name, "easyjs");
        assert_eq!(config.release_dir, Utf8PathBuf::from("releases"));
        assert_eq!(config.stdlib.version_file, Utf8PathBuf::from("lib/version"));
        let platforms: Vec<&str> = config
            .targets
            .iter()
            .map(|t| t.platform().as_str())
            .collect();
        assert_eq!(platforms, ["windows-x64", "macos", "linux"]);
    }

    #[rstest]
    fn empty_file_yields_defaults() {
        let config = parse("").expect("empty config parses");
        assert_eq!(config, ReleaseConfig::default());
    }

    #[rstest]
    fn deserialises_overrides_from_toml() {
        let source = concat!(
            "binary_name = \"ej\"\n",
            "[stdlib]\n",
            "source_dir = \"std\"\n",
            "[[targets]]\n",
            "platform = \"linux-arm\"\n",
            "triple = \"aarch64-unknown-linux-gnu\"\n",
        );

        let config = parse(source).unwrap_or_else(|err| panic!("config should parse: {err}"));
        assert_eq!(config.binary_name, "ej");
        assert_eq!(config.stdlib.source_dir, Utf8PathBuf::from("std"));
        assert_eq!(config.stdlib.extension, "ej");
        assert_eq!(config.targets.len(), 1);
        assert_eq!(
            config.targets.first().map(|t| t.triple().as_str()),
            Some("aarch64-unknown-linux-gnu")
        );
    }

    #[rstest]
    #[case::unknown_key("colour = \"red\"\n")]
    #[case::empty_binary("binary_name = \"\"\n")]
    #[case::no_targets("targets = []\n")]
    #[case::dotted_extension("[stdlib]\nextension = \".ej\"\n")]
    #[case::bad_triple("[[targets]]\nplatform = \"linux\"\ntriple = \"linux\"\n")]
    #[case::bad_platform("[[targets]]\nplatform = \"../up\"\ntriple = \"x86_64-unknown-linux-gnu\"\n")]
    #[case::duplicate_platform(concat!(
        "[[targets]]\nplatform = \"linux\"\ntriple = \"x86_64-unknown-linux-gnu\"\n",
        "[[targets]]\nplatform = \"linux\"\ntriple = \"aarch64-unknown-linux-gnu\"\n",
    ))]
    fn rejects_invalid_configuration(#[case] source: &str) {
        let err = parse(source).expect_err("config should be rejected");
        assert!(matches!(err, PackagerError::InvalidConfig { .. }), "{err}");
    }

    #[rstest]
    fn resolves_relative_paths_against_root() {
        let config = ReleaseConfig::default().resolved(Utf8Path::new("/work/easyjs"));
        assert_eq!(config.release_dir, Utf8PathBuf::from("/work/easyjs/releases"));
        assert_eq!(
            config.stdlib.output,
            Utf8PathBuf::from("/work/easyjs/src/generated.rs")
        );
    }

    #[rstest]
    fn load_without_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf8 path");
        let config = ReleaseConfig::load(&root, None).expect("defaults load");
        assert_eq!(config.build_root, root.join("target"));
    }

    #[rstest]
    fn load_with_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf8 path");
        let err = ReleaseConfig::load(&root, Some(Utf8Path::new("missing.toml")))
            .expect_err("explicit file must exist");
        assert!(matches!(err, PackagerError::InvalidConfig { .. }));
    }
}
