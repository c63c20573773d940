//! Generated function naming.

use std::collections::HashMap;

use indexmap::IndexMap;
use kodec_ir::{TypeDef, TypeId};
use tracing::trace;

/// Escape a type's module path and name into an identifier fragment.
///
/// Unnamed types use the `anonymous` placeholder. Every character that is
/// not a letter or digit becomes `_`.
pub fn safe_name(def: &TypeDef) -> String {
    let mut name = def.module.clone();
    match &def.name {
        Some(local) => {
            name.push('.');
            name.push_str(local);
        }
        None => name.push_str("anonymous"),
    }

    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Registry of generated function names.
///
/// Guarantees that distinct types never share a name and that a given
/// `(prefix, type)` pair always resolves to the same name within a run.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    names: IndexMap<String, TypeId>,
    assigned: HashMap<(String, TypeId), String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the function with the given prefix generated for `id`.
    pub fn function_name(&mut self, prefix: &str, id: TypeId, def: &TypeDef) -> String {
        let key = (prefix.to_string(), id);
        if let Some(existing) = self.assigned.get(&key) {
            return existing.clone();
        }

        let canonical = format!("{}{}", prefix, safe_name(def));
        let mut name = canonical.clone();
        let mut suffix = 1u32;
        // Names are global across prefixes.
        while self.names.contains_key(&name) {
            name = format!("{}{}", canonical, suffix);
            suffix += 1;
        }
        if name != canonical {
            trace!(candidate = %name, %canonical, "resolved function name clash");
        }

        self.names.insert(name.clone(), id);
        self.assigned.insert(key, name.clone());
        name
    }

    /// Type owning a generated name, if any.
    pub fn owner(&self, name: &str) -> Option<TypeId> {
        self.names.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
