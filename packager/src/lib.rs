//! EasyJS packager library.
//!
//! This crate embeds the EasyJS standard library into a generated Rust module
//! and packages cross-compiled toolchain binaries into versioned releases. It
//! backs the `easyjs-embed-std`, `easyjs-release`, and `easyjs-build`
//! binaries and can be driven programmatically for testing.
//!
//! # Modules
//!
//! - [`builder`] - Compiler invocation and artifact verification
//! - [`cli`] - Command-line argument definitions
//! - [`codegen`] - Rendering of the generated dispatch module
//! - [`config`] - `release.toml` loading and defaults
//! - [`embedder`] - Standard library discovery and regeneration
//! - [`error`] - Error types and failure categories
//! - [`local_build`] - The developer build front-end
//! - [`lock`] - Exclusive release lock
//! - [`logger`] - `env_logger` setup for the binaries
//! - [`manifest`] - Release manifest with artifact digests
//! - [`module_name`] - Library module names and generated identifiers
//! - [`output`] - Progress and summary text
//! - [`pipeline`] - Release orchestration
//! - [`platform`] - Platform aliases accepted by the front-end
//! - [`sanitize`] - Source normalisation and Rust string escaping
//! - [`stager`] - Copying binaries into the release tree
//! - [`target`] - Release targets and triples
//! - [`version`] - Standard library version marker
//! - [`workspace`] - Workspace root detection

pub mod builder;
pub mod cli;
pub mod codegen;
pub mod config;
pub mod embedder;
pub mod error;
pub mod local_build;
pub mod lock;
pub mod logger;
pub mod manifest;
pub mod module_name;
pub mod output;
pub mod pipeline;
pub mod platform;
pub mod sanitize;
pub mod stager;
pub mod target;
pub mod version;
pub mod workspace;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
