//! The `manifest.json` written once every target of a release is staged.
//!
//! Its presence marks the version directory as complete. Each entry records
//! where the binary lives relative to the version directory together with its
//! size and SHA-256 digest.

use crate::error::{PackagerError, Result};
use crate::stager::ReleaseArtifact;
use crate::version::VersionTag;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;

/// Filename of the manifest inside a version directory.
pub const MANIFEST_FILENAME: &str = "manifest.json";

/// One released binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    /// Release directory name, e.g. `macos`.
    pub platform: String,
    /// Compiler target triple.
    pub triple: String,
    /// Path relative to the version directory, `/`-separated.
    pub path: String,
    /// Size in bytes.
    pub size: u64,
    /// Lowercase hex SHA-256 of the file contents.
    pub sha256: String,
}

impl ManifestEntry {
    /// Describe a staged artifact, hashing its contents.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::ReadFailed`] if the file cannot be read.
    pub fn from_artifact(artifact: &ReleaseArtifact) -> Result<Self> {
        let read_failed = |source| PackagerError::ReadFailed {
            path: artifact.path.clone(),
            source,
        };
        let size = fs::metadata(&artifact.path).map_err(read_failed)?.len();
        let sha256 = compute_sha256(&artifact.path).map_err(read_failed)?;
        let filename = artifact.path.file_name().unwrap_or_default();

        Ok(Self {
            platform: artifact.target.platform().to_string(),
            triple: artifact.target.triple().to_string(),
            path: format!("{}/{filename}", artifact.target.platform()),
            size,
            sha256,
        })
    }
}

/// Summary of a complete release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseManifest {
    /// Release version.
    pub version: String,
    /// Name of the released binary.
    pub binary_name: String,
    /// One entry per target, in processing order.
    pub artifacts: Vec<ManifestEntry>,
}

impl ReleaseManifest {
    /// Build a manifest for `artifacts`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::ReadFailed`] if any artifact cannot be hashed.
    pub fn new(
        version: &VersionTag,
        binary_name: &str,
        artifacts: &[ReleaseArtifact],
    ) -> Result<Self> {
        Ok(Self {
            version: version.to_string(),
            binary_name: binary_name.to_owned(),
            artifacts: artifacts
                .iter()
                .map(ManifestEntry::from_artifact)
                .collect::<Result<_>>()?,
        })
    }

    /// Write the manifest as pretty-printed JSON into `version_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::Serialization`] or
    /// [`PackagerError::WriteFailed`] on failure.
    pub fn write(&self, version_dir: &Utf8Path) -> Result<Utf8PathBuf> {
        let path = version_dir.join(MANIFEST_FILENAME);
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        fs::write(&path, json).map_err(|source| PackagerError::WriteFailed {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// Compute the lowercase hex SHA-256 digest of a file.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be opened or read.
pub fn compute_sha256(path: &Utf8Path) -> std::io::Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::{PlatformName, ReleaseTarget, TargetTriple};
    use rstest::rstest;
    use serde_json::Value;

    fn artifact(root: &Utf8Path, platform: &str, triple: &str, contents: &[u8]) -> ReleaseArtifact {
        let target = ReleaseTarget::new(
            PlatformName::try_from(platform).expect("valid platform"),
            TargetTriple::try_from(triple).expect("valid triple"),
        );
        let dir = root.join(platform);
        fs::create_dir_all(&dir).expect("create platform dir");
        let path = dir.join(target.binary_filename("easyjs"));
        fs::write(&path, contents).expect("write binary");
        ReleaseArtifact { target, path }
    }

    #[rstest]
    fn sha256_of_known_content() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf8 path");
        let path = root.join("abc");
        fs::write(&path, b"abc").expect("write");

        assert_eq!(
            compute_sha256(&path).expect("hash"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[rstest]
    fn manifest_lists_every_artifact_in_order() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf8 path");
        let artifacts = [
            artifact(&root, "windows-x64", "x86_64-pc-windows-gnu", b"win"),
            artifact(&root, "linux", "x86_64-unknown-linux-gnu", b"linux!"),
        ];
        let version = VersionTag::try_from("v0.4.5").expect("valid version");

        let manifest = ReleaseManifest::new(&version, "easyjs", &artifacts).expect("manifest");
        let path = manifest.write(&root).expect("write manifest");

        let json: Value =
            serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("valid json");
        assert_eq!(json["version"], "v0.4.5");
        assert_eq!(json["binary_name"], "easyjs");
        assert_eq!(json["artifacts"][0]["path"], "windows-x64/easyjs.exe");
        assert_eq!(json["artifacts"][0]["size"], 3);
        assert_eq!(json["artifacts"][1]["platform"], "linux");
        assert_eq!(json["artifacts"][1]["triple"], "x86_64-unknown-linux-gnu");
        assert_eq!(
            json["artifacts"][1]["sha256"].as_str().map(str::len),
            Some(64)
        );
    }

    #[rstest]
    fn missing_artifact_cannot_be_described() {
        let target = ReleaseTarget::new(
            PlatformName::try_from("linux").expect("valid platform"),
            TargetTriple::try_from("x86_64-unknown-linux-gnu").expect("valid triple"),
        );
        let missing = ReleaseArtifact {
            target,
            path: Utf8PathBuf::from("/nonexistent/easyjs"),
        };
        let err = ManifestEntry::from_artifact(&missing).expect_err("should fail");
        assert!(matches!(err, PackagerError::ReadFailed { .. }));
    }
}
