//! Rendering of the generated standard library module.
//!
//! The output is a self-contained Rust source file with one constant per
//! module, a sorted list of module names, the library version, and a
//! `load_std` dispatch function. Rendering is a pure function of its inputs:
//! the same version and module set always produce byte-identical text.

use crate::embedder::LibraryModule;
use crate::sanitize::string_literal;
use crate::version::VersionTag;

/// Name of the tool recorded in the generated file header.
const GENERATOR: &str = "easyjs-embed-std";

/// A rendered generated module, ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedModule {
    text: String,
}

impl GeneratedModule {
    /// Render the generated module for `modules`, which must already be in
    /// dispatch order.
    #[must_use]
    pub fn render<'a>(
        version: &VersionTag,
        modules: impl IntoIterator<Item = &'a LibraryModule> + Clone,
    ) -> Self {
        let mut text = String::new();

        text.push_str(&format!(
            "// @generated by {GENERATOR}. Do not edit by hand.\n"
        ));
        text.push_str(&format!(
            "// EasyJS standard library version {version}.\n\n"
        ));

        text.push_str("/// Standard library version these modules were generated from.\n");
        text.push_str(&format!(
            "pub const STD_VERSION: &str = {};\n\n",
            string_literal(version.as_str())
        ));

        text.push_str("/// Names of every embedded standard library module, sorted.\n");
        text.push_str("pub const STD_MODULES: &[&str] = &[\n");
        for module in modules.clone() {
            text.push_str(&format!("    {},\n", string_literal(module.name().as_str())));
        }
        text.push_str("];\n\n");

        for module in modules.clone() {
            text.push_str(&format!(
                "const {}: &str = {};\n",
                module.name().identifier(),
                string_literal(module.sanitized())
            ));
        }

        text.push_str(&format!(
            "\n/// Load a standard library module from EasyJS version {version}, or an empty string if not found.\n"
        ));
        text.push_str("#[must_use]\n");
        text.push_str("pub fn load_std(name: &str) -> &'static str {\n");
        text.push_str("    match name {\n");
        for module in modules {
            text.push_str(&format!(
                "        {} => {},\n",
                string_literal(module.name().as_str()),
                module.name().identifier()
            ));
        }
        text.push_str("        _ => \"\",\n");
        text.push_str("    }\n");
        text.push_str("}\n");

        Self { text }
    }

    /// Return the rendered source text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Return the rendered source as bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }
}
