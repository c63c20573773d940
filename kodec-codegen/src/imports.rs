//! Import alias allocation.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use kodec_core::last_path_segment;

/// Module providing the streaming JSON writer used by generated encoders.
pub const WRITER_MODULE: &str = "github.com/kodec-rs/runtime/jwriter";
/// Module providing the JSON lexer used by generated decoders.
pub const LEXER_MODULE: &str = "github.com/kodec-rs/runtime/jlexer";
/// Standard library JSON package, imported for its marker interfaces.
pub const JSON_MODULE: &str = "encoding/json";

/// Maps module paths to short, unique import aliases.
///
/// Once a path is aliased it keeps that alias for the rest of the run, and
/// no two paths ever share an alias.
///
/// # Example
///
/// ```
/// use kodec_codegen::AliasTable;
///
/// let mut imports = AliasTable::new();
/// assert_eq!(imports.alias_for("example.com/a/models"), "models");
/// assert_eq!(imports.alias_for("example.com/b/models"), "models1");
/// assert_eq!(imports.alias_for("example.com/a/models"), "models");
/// ```
#[derive(Debug, Clone)]
pub struct AliasTable {
    /// Module path -> alias, in allocation order
    by_path: IndexMap<String, String>,
    /// Alias -> module path, sorted for rendering
    by_alias: BTreeMap<String, String>,
}

impl AliasTable {
    /// Create a table with the well-known runtime modules pre-registered.
    pub fn new() -> Self {
        let mut table = Self::empty();
        table.register(WRITER_MODULE, "jwriter");
        table.register(LEXER_MODULE, "jlexer");
        table.register(JSON_MODULE, "json");
        table
    }

    /// Create a table without any registered module.
    pub fn empty() -> Self {
        Self {
            by_path: IndexMap::new(),
            by_alias: BTreeMap::new(),
        }
    }

    /// Register a well-known module under a fixed alias.
    ///
    /// Returns false and leaves the table untouched if either the path or
    /// the alias is already taken.
    pub fn register(&mut self, path: &str, alias: &str) -> bool {
        if self.by_path.contains_key(path) || self.by_alias.contains_key(alias) {
            return false;
        }
        self.by_path.insert(path.to_string(), alias.to_string());
        self.by_alias.insert(alias.to_string(), path.to_string());
        true
    }

    /// Alias for a module path, allocating one on first use.
    ///
    /// The candidate is the last path segment. On collision the candidate is
    /// suffixed with 1, 2, ... until a free alias is found.
    pub fn alias_for(&mut self, path: &str) -> String {
        if let Some(alias) = self.by_path.get(path) {
            return alias.clone();
        }

        let base = last_path_segment(path);
        let mut alias = base.to_string();
        let mut suffix = 0u32;
        while self.by_alias.contains_key(&alias) {
            suffix += 1;
            alias = format!("{}{}", base, suffix);
        }

        self.by_path.insert(path.to_string(), alias.clone());
        self.by_alias.insert(alias.clone(), path.to_string());
        alias
    }

    /// Look up an alias without allocating.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.by_path.get(path).map(String::as_str)
    }

    /// Iterate `(alias, path)` pairs sorted by alias.
    pub fn sorted(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_alias.iter().map(|(a, p)| (a.as_str(), p.as_str()))
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::new()
    }
}
