//! Standard library embedding.
//!
//! The embedder scans the library source directory, sanitises every module,
//! and regenerates the dispatch module consumed by the `easyjs-std` crate.
//! The generated file is always replaced wholesale: it is rendered completely
//! in memory and then persisted over the previous version through a temporary
//! file in the same directory, so a failed run never leaves partial output.

use crate::codegen::GeneratedModule;
use crate::config::StdlibConfig;
use crate::error::{PackagerError, Result};
use crate::module_name::ModuleName;
use crate::sanitize::sanitize;
use crate::version::VersionTag;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::io::Write;

/// One standard library source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryModule {
    name: ModuleName,
    path: Utf8PathBuf,
    raw: String,
    sanitized: String,
}

impl LibraryModule {
    /// Create a module from its raw text, sanitising it eagerly.
    #[must_use]
    pub fn new(name: ModuleName, path: Utf8PathBuf, raw: String) -> Self {
        let sanitized = sanitize(&raw);
        Self {
            name,
            path,
            raw,
            sanitized,
        }
    }

    /// Read the module stored at `path`, naming it after the file stem.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::ReadFailed`] naming the file if it cannot be
    /// read as UTF-8 text.
    pub fn read(path: &Utf8Path) -> Result<Self> {
        let stem = path.file_stem().unwrap_or_default();
        let raw = std::fs::read_to_string(path).map_err(|source| PackagerError::ReadFailed {
            path: path.to_owned(),
            source,
        })?;
        Ok(Self::new(ModuleName::from(stem), path.to_owned(), raw))
    }

    /// The module's dispatch name.
    #[must_use]
    pub fn name(&self) -> &ModuleName {
        &self.name
    }

    /// Where the module was read from.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// The text exactly as read from disk.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The text after whitespace normalisation.
    #[must_use]
    pub fn sanitized(&self) -> &str {
        &self.sanitized
    }
}

/// List the module files in `dir` carrying `extension`, sorted by path.
///
/// Subdirectories are not searched.
///
/// # Errors
///
/// Returns [`PackagerError::SourceDirNotFound`] if `dir` is not a directory,
/// or an I/O error if it cannot be listed.
pub fn discover_modules(dir: &Utf8Path, extension: &str) -> Result<Vec<Utf8PathBuf>> {
    if !dir.is_dir() {
        return Err(PackagerError::SourceDirNotFound {
            path: dir.to_owned(),
        });
    }

    let mut paths = Vec::new();
    for entry in dir.read_dir_utf8()? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension() == Some(extension) {
            paths.push(path.to_owned());
        }
    }
    paths.sort();
    Ok(paths)
}

/// The complete standard library for one generation run.
///
/// This is the in-memory form of the generated module: an immutable mapping
/// from module name to sanitised text, with a lookup that never fails.
#[derive(Debug, Clone)]
pub struct StdLibrary {
    version: VersionTag,
    modules: BTreeMap<ModuleName, LibraryModule>,
}

impl StdLibrary {
    /// Read the version marker and every module described by `config`.
    ///
    /// # Errors
    ///
    /// Fails if the version marker or source directory is missing, if no
    /// modules are found, if any module cannot be read, or if two modules map
    /// to the same generated identifier.
    pub fn collect(config: &StdlibConfig) -> Result<Self> {
        let version = VersionTag::read(&config.version_file)?;
        let paths = discover_modules(&config.source_dir, &config.extension)?;
        if paths.is_empty() {
            return Err(PackagerError::NoModules {
                dir: config.source_dir.clone(),
                extension: config.extension.clone(),
            });
        }

        let modules = paths
            .iter()
            .map(|path| LibraryModule::read(path))
            .collect::<Result<Vec<_>>>()?;
        Self::from_modules(version, modules)
    }

    /// Assemble a library from already-loaded modules.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::DuplicateModule`] if two modules share a
    /// generated identifier.
    pub fn from_modules(
        version: VersionTag,
        modules: impl IntoIterator<Item = LibraryModule>,
    ) -> Result<Self> {
        let mut identifiers: BTreeMap<String, Utf8PathBuf> = BTreeMap::new();
        let mut by_name = BTreeMap::new();

        for module in modules {
            match identifiers.entry(module.name().identifier()) {
                Entry::Occupied(existing) => {
                    return Err(PackagerError::DuplicateModule {
                        identifier: existing.key().clone(),
                        first: existing.get().clone(),
                        second: module.path().to_owned(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(module.path().to_owned());
                }
            }
            debug!(
                "embedding module {} from {} ({} bytes)",
                module.name(),
                module.path(),
                module.sanitized().len()
            );
            by_name.insert(module.name().clone(), module);
        }

        Ok(Self {
            version,
            modules: by_name,
        })
    }

    /// The version stamped into this library.
    #[must_use]
    pub fn version(&self) -> &VersionTag {
        &self.version
    }

    /// Number of modules in the library.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the library holds no modules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Iterate over modules in dispatch order.
    pub fn modules(&self) -> impl Iterator<Item = &LibraryModule> + Clone {
        self.modules.values()
    }

    /// Look up a module's sanitised text, or `""` for an unknown name.
    #[must_use]
    pub fn load_std(&self, name: &str) -> &str {
        self.modules
            .get(&ModuleName::from(name))
            .map_or("", LibraryModule::sanitized)
    }

    /// Render the generated module for this library.
    #[must_use]
    pub fn render(&self) -> GeneratedModule {
        GeneratedModule::render(&self.version, self.modules())
    }
}

/// Summary of a completed embedding run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedReport {
    /// Path of the generated module.
    pub output: Utf8PathBuf,
    /// Version stamped into the module.
    pub version: VersionTag,
    /// Names of the embedded modules, in dispatch order.
    pub modules: Vec<ModuleName>,
    /// Whether the new output differs from what was on disk before.
    pub changed: bool,
}

/// Regenerate the standard library module described by `config`.
///
/// # Errors
///
/// Propagates every failure from [`StdLibrary::collect`]; returns
/// [`PackagerError::WriteFailed`] if the output cannot be replaced. Nothing is
/// written unless collection succeeds.
pub fn embed_std(config: &StdlibConfig) -> Result<EmbedReport> {
    let library = StdLibrary::collect(config)?;
    let generated = library.render();

    let changed = std::fs::read(&config.output)
        .map_or(true, |existing| existing != generated.as_bytes());
    write_atomically(&config.output, generated.as_bytes())?;

    Ok(EmbedReport {
        output: config.output.clone(),
        version: library.version().clone(),
        modules: library.modules().map(|m| m.name().clone()).collect(),
        changed,
    })
}

/// Verify that the generated module on disk matches a fresh generation.
///
/// # Errors
///
/// Returns [`PackagerError::StaleModule`] if the file is missing or differs,
/// or any collection failure from [`StdLibrary::collect`].
pub fn check_std(config: &StdlibConfig) -> Result<()> {
    let library = StdLibrary::collect(config)?;
    let generated = library.render();
    match std::fs::read(&config.output) {
        Ok(existing) if existing == generated.as_bytes() => Ok(()),
        Ok(_) => Err(PackagerError::StaleModule {
            path: config.output.clone(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(PackagerError::StaleModule {
                path: config.output.clone(),
            })
        }
        Err(source) => Err(PackagerError::ReadFailed {
            path: config.output.clone(),
            source,
        }),
    }
}

/// Replace `path` with `contents` via a temporary sibling file.
fn write_atomically(path: &Utf8Path, contents: &[u8]) -> Result<()> {
    let write_failed = |source: std::io::Error| PackagerError::WriteFailed {
        path: path.to_owned(),
        source,
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_failed)?;

    let mut temp = tempfile::NamedTempFile::new_in(parent).map_err(write_failed)?;
    temp.write_all(contents).map_err(write_failed)?;
    temp.flush().map_err(write_failed)?;
    temp.persist(path).map_err(|err| write_failed(err.error))?;
    Ok(())
}
