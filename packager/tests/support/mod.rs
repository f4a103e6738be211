//! Test support utilities for packager integration tests.
//!
//! Provides a throwaway EasyJS workspace with a small standard library so
//! tests can run the embedder and release pipeline against real files.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// A temporary EasyJS workspace.
pub struct TempWorkspace {
    _temp: TempDir,
    root: Utf8PathBuf,
}

impl TempWorkspace {
    /// Create a workspace holding `lib/version` (`v0.4.5`) and two modules.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("failed to create temp dir");
        let root = Utf8PathBuf::try_from(temp.path().to_owned()).expect("non-UTF8 temp path");
        let workspace = Self { _temp: temp, root };

        workspace.write("Cargo.toml", "[workspace]\nmembers = []\n");
        workspace.write("lib/version", "v0.4.5\n");
        workspace.write("lib/io.ej", "fn print(x) {}");
        workspace.write("lib/json.ej", "to_json := fn(str) {\treturn JSON.parse(str); }\r\n");
        workspace
    }

    /// The workspace root.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Write `contents` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directory");
        }
        fs::write(&path, contents).expect("failed to write workspace file");
    }

    /// Read a workspace file as text.
    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.root.join(relative)).expect("failed to read workspace file")
    }

    /// Whether a workspace path exists.
    pub fn exists(&self, relative: &str) -> bool {
        self.root.join(relative).exists()
    }
}
