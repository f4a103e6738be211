//! Semantic wrapper for standard library module names.
//!
//! This module provides the [`ModuleName`] newtype. A module name is the file
//! stem of a library source file and is the key the generated dispatch
//! function matches on; [`ModuleName::identifier`] derives the Rust constant
//! name that holds the module's text.

use std::fmt;

/// Suffix appended to every generated module constant.
///
/// Keeps module constants in a namespace that cannot clash with the
/// `STD_VERSION` and `STD_MODULES` items emitted alongside them.
const IDENTIFIER_SUFFIX: &str = "_SRC";

/// The name of a standard library module, taken from its file stem.
///
/// Ordering is byte-wise on the original stem, which is the order modules are
/// emitted in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleName(String);

impl ModuleName {
    /// Create a new module name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the module name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive the constant identifier used in the generated module.
    ///
    /// ASCII letters are upper-cased, digits are kept, and everything else
    /// becomes `_`. Names that would start with a digit gain a leading `_`.
    ///
    /// # Examples
    ///
    /// ```
    /// use easyjs_packager::module_name::ModuleName;
    ///
    /// assert_eq!(ModuleName::from("http-client").identifier(), "HTTP_CLIENT_SRC");
    /// assert_eq!(ModuleName::from("3d").identifier(), "_3D_SRC");
    /// ```
    #[must_use]
    pub fn identifier(&self) -> String {
        let mut ident: String = self
            .0
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        if ident.chars().next().is_none_or(|c| c.is_ascii_digit()) {
            ident.insert(0, '_');
        }
        ident.push_str(IDENTIFIER_SUFFIX);
        ident
    }
}

impl AsRef<str> for ModuleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModuleName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ModuleName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("io", "IO_SRC")]
    #[case::snake("easy_wasm", "EASY_WASM_SRC")]
    #[case::hyphen("http-client", "HTTP_CLIENT_SRC")]
    #[case::dotted("v1.compat", "V1_COMPAT_SRC")]
    #[case::leading_digit("2d", "_2D_SRC")]
    #[case::non_ascii("café", "CAF__SRC")]
    #[case::reserved_looking("std_version", "STD_VERSION_SRC")]
    fn identifier_normalises_stem(#[case] stem: &str, #[case] expected: &str) {
        assert_eq!(ModuleName::from(stem).identifier(), expected);
    }

    #[test]
    fn ordering_follows_original_stem() {
        let mut names = vec![
            ModuleName::from("json"),
            ModuleName::from("dom"),
            ModuleName::from("http"),
        ];
        names.sort();
        let sorted: Vec<&str> = names.iter().map(ModuleName::as_str).collect();
        assert_eq!(sorted, ["dom", "http", "json"]);
    }
}
