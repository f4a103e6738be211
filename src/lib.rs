//! The EasyJS standard library, embedded as static source text.
//!
//! Module sources live in `lib/*.ej` and are compiled into this crate through
//! the generated `generated.rs`, which `easyjs-embed-std` rewrites from
//! scratch whenever the library changes. The compiler resolves `import`
//! statements for standard modules through [`load_std`].

mod generated;

pub use generated::{STD_MODULES, STD_VERSION, load_std};

/// Whether `name` is a standard library module.
#[must_use]
pub fn is_std_module(name: &str) -> bool {
    STD_MODULES.binary_search(&name).is_ok()
}
