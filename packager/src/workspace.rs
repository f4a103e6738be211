//! Workspace detection.
//!
//! Every packager command runs relative to the EasyJS workspace root: the
//! directory holding `lib/`, `release.toml`, and the compiler's `Cargo.toml`.
//! When no root is given on the command line it is found by walking up from
//! the current directory.

use crate::config::CONFIG_FILENAME;
use crate::error::{PackagerError, Result};
use camino::{Utf8Path, Utf8PathBuf};

/// Resolve the workspace root from an optional command-line override.
///
/// An explicit root must be an existing directory and is made absolute
/// against the current directory. Otherwise [`find_workspace_root`] searches
/// upwards from the current directory.
///
/// # Errors
///
/// Returns [`PackagerError::WorkspaceNotFound`] if the override is not a
/// directory, no root can be found, or the current directory is not UTF-8.
pub fn resolve_workspace_root(explicit: Option<&Utf8Path>) -> Result<Utf8PathBuf> {
    let cwd = current_dir_utf8()?;
    match explicit {
        Some(path) => {
            let root = if path.is_absolute() {
                path.to_owned()
            } else {
                cwd.join(path)
            };
            if root.is_dir() {
                Ok(root)
            } else {
                Err(PackagerError::WorkspaceNotFound {
                    reason: format!("{root} is not a directory"),
                })
            }
        }
        None => find_workspace_root(&cwd),
    }
}

/// Find the workspace root at or above `start`.
///
/// The nearest ancestor holding a `release.toml` or a `Cargo.toml` with a
/// `[workspace]` table wins. Failing that, the nearest ancestor with any
/// `Cargo.toml` is used.
///
/// # Errors
///
/// Returns [`PackagerError::WorkspaceNotFound`] if no ancestor has a
/// `Cargo.toml`.
pub fn find_workspace_root(start: &Utf8Path) -> Result<Utf8PathBuf> {
    if let Some(root) = start.ancestors().find(|dir| is_marked_root(dir)) {
        return Ok(root.to_owned());
    }

    start
        .ancestors()
        .find(|dir| dir.join("Cargo.toml").is_file())
        .map(Utf8Path::to_owned)
        .ok_or_else(|| PackagerError::WorkspaceNotFound {
            reason: format!("no Cargo.toml found at or above {start}"),
        })
}

fn is_marked_root(dir: &Utf8Path) -> bool {
    dir.join(CONFIG_FILENAME).is_file() || has_workspace_table(&dir.join("Cargo.toml"))
}

/// Check if a `Cargo.toml` file contains a `[workspace]` section.
fn has_workspace_table(cargo_toml: &Utf8Path) -> bool {
    std::fs::read_to_string(cargo_toml)
        .ok()
        .and_then(|contents| contents.parse::<toml::Table>().ok())
        .is_some_and(|table| table.contains_key("workspace"))
}

/// Gets the current directory as a UTF-8 path.
fn current_dir_utf8() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir()?;
    Utf8PathBuf::try_from(cwd).map_err(|e| PackagerError::WorkspaceNotFound {
        reason: format!("current directory is not valid UTF-8: {e}"),
    })
}
