//! Copying verified binaries into the versioned release tree.
//!
//! The layout is `<release_dir>/<version>/<platform>/<binary>[.exe]`. The
//! version directory is discarded before a run stages anything, so a release
//! left behind by an aborted run is never mixed with fresh artifacts.

use crate::builder::BuildResult;
use crate::error::{PackagerError, Result};
use crate::target::ReleaseTarget;
use crate::version::VersionTag;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// A binary copied into the release tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseArtifact {
    /// The target the binary was built for.
    pub target: ReleaseTarget,
    /// Absolute path of the released copy.
    pub path: Utf8PathBuf,
}

/// Stages binaries under one release version.
#[derive(Debug, Clone)]
pub struct Stager {
    release_dir: Utf8PathBuf,
    version: VersionTag,
}

impl Stager {
    /// Create a stager for `version` below `release_dir`.
    #[must_use]
    pub fn new(release_dir: Utf8PathBuf, version: VersionTag) -> Self {
        Self {
            release_dir,
            version,
        }
    }

    /// The release root, e.g. `releases/`.
    #[must_use]
    pub fn release_dir(&self) -> &Utf8Path {
        &self.release_dir
    }

    /// The directory for this version, e.g. `releases/v0.4.5`.
    #[must_use]
    pub fn version_dir(&self) -> Utf8PathBuf {
        self.release_dir.join(self.version.as_str())
    }

    /// The directory a target's binary is copied into.
    #[must_use]
    pub fn platform_dir(&self, target: &ReleaseTarget) -> Utf8PathBuf {
        self.version_dir().join(target.platform().as_str())
    }

    /// Remove any release previously staged for this version.
    ///
    /// Returns `true` if a directory was removed.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::Io`] if the directory exists but cannot be
    /// removed.
    pub fn discard_previous(&self) -> Result<bool> {
        let dir = self.version_dir();
        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                log::info!("discarded previous release at {dir}");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(PackagerError::Io(e)),
        }
    }

    /// Copy a verified binary into its platform directory.
    ///
    /// The directory is created if needed and an existing copy is replaced.
    /// `std::fs::copy` carries the source's permission bits across, so an
    /// executable stays executable.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::Io`] if the platform directory cannot be
    /// created and [`PackagerError::CopyFailed`] if the copy fails.
    pub fn stage(
        &self,
        target: &ReleaseTarget,
        binary_name: &str,
        build: &BuildResult,
    ) -> Result<ReleaseArtifact> {
        let dir = self.platform_dir(target);
        fs::create_dir_all(&dir)?;

        let dest = dir.join(target.binary_filename(binary_name));
        fs::copy(&build.binary_path, &dest).map_err(|source| PackagerError::CopyFailed {
            from: build.binary_path.clone(),
            to: dest.clone(),
            source,
        })?;

        log::info!("staged {target} at {dest}");
        Ok(ReleaseArtifact {
            target: target.clone(),
            path: dest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::{PlatformName, TargetTriple};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct Tree {
        _dir: TempDir,
        root: Utf8PathBuf,
    }

    #[fixture]
    fn tree() -> Tree {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf8 path");
        Tree { _dir: dir, root }
    }

    fn stager(root: &Utf8Path) -> Stager {
        Stager::new(
            root.join("releases"),
            VersionTag::try_from("v0.4.5").expect("valid version"),
        )
    }

    fn target(platform: &str, triple: &str) -> ReleaseTarget {
        ReleaseTarget::new(
            PlatformName::try_from(platform).expect("valid platform"),
            TargetTriple::try_from(triple).expect("valid triple"),
        )
    }

    fn built(root: &Utf8Path, name: &str) -> BuildResult {
        let path = root.join("target").join(name);
        fs::create_dir_all(root.join("target")).expect("create target dir");
        fs::write(&path, b"binary").expect("write binary");
        BuildResult {
            target: None,
            binary_path: path,
        }
    }

    #[rstest]
    fn stages_into_versioned_platform_directory(tree: Tree) {
        let stager = stager(&tree.root);
        let linux = target("linux", "x86_64-unknown-linux-gnu");
        let build = built(&tree.root, "easyjs");

        let artifact = stager.stage(&linux, "easyjs", &build).expect("stage");

        assert_eq!(artifact.path, tree.root.join("releases/v0.4.5/linux/easyjs"));
        assert_eq!(fs::read(&artifact.path).expect("read copy"), b"binary");
    }

    #[rstest]
    fn windows_target_gets_exe_suffix(tree: Tree) {
        let stager = stager(&tree.root);
        let windows = target("windows-x64", "x86_64-pc-windows-gnu");
        let build = built(&tree.root, "easyjs.exe");

        let artifact = stager.stage(&windows, "easyjs", &build).expect("stage");
        assert!(artifact.path.ends_with("v0.4.5/windows-x64/easyjs.exe"));
    }

    #[rstest]
    fn staging_twice_replaces_the_copy(tree: Tree) {
        let stager = stager(&tree.root);
        let linux = target("linux", "x86_64-unknown-linux-gnu");
        let build = built(&tree.root, "easyjs");

        stager.stage(&linux, "easyjs", &build).expect("first stage");
        fs::write(&build.binary_path, b"rebuilt").expect("rewrite binary");
        let artifact = stager.stage(&linux, "easyjs", &build).expect("second stage");

        assert_eq!(fs::read(&artifact.path).expect("read copy"), b"rebuilt");
    }

    #[rstest]
    fn discard_previous_removes_stale_version(tree: Tree) {
        let stager = stager(&tree.root);
        let stale = stager.version_dir().join("macos");
        fs::create_dir_all(&stale).expect("create stale dir");
        fs::write(stale.join("easyjs"), b"old").expect("write stale binary");

        assert!(stager.discard_previous().expect("discard"));
        assert!(!stager.version_dir().exists());
        assert!(!stager.discard_previous().expect("discard again"));
    }

    #[rstest]
    fn missing_source_binary_is_copy_failure(tree: Tree) {
        let stager = stager(&tree.root);
        let linux = target("linux", "x86_64-unknown-linux-gnu");
        let build = BuildResult {
            target: None,
            binary_path: tree.root.join("target/absent"),
        };

        let err = stager.stage(&linux, "easyjs", &build).expect_err("copy fails");
        assert!(matches!(err, PackagerError::CopyFailed { .. }));
    }

    #[cfg(unix)]
    #[rstest]
    fn preserves_executable_permissions(tree: Tree) {
        use std::os::unix::fs::PermissionsExt;

        let stager = stager(&tree.root);
        let linux = target("linux", "x86_64-unknown-linux-gnu");
        let build = built(&tree.root, "easyjs");
        fs::set_permissions(&build.binary_path, fs::Permissions::from_mode(0o755))
            .expect("chmod");

        let artifact = stager.stage(&linux, "easyjs", &build).expect("stage");
        let mode = fs::metadata(&artifact.path)
            .expect("metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
