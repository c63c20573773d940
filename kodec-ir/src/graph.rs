//! Arena of type definitions.

use std::{collections::HashMap, fmt, ops::Index};

use crate::{Field, Primitive, TypeDef, TypeKind};

/// Handle to a type in a [`TypeGraph`].
///
/// Equality is identity: two handles are equal only if they point at the
/// same arena slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    /// Build a handle from a raw arena index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Arena index of this handle.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Statically built graph of every type the generator may reach.
///
/// Builtins and structural types (`[]T`, `*T`, `map[K]V`) are interned so the
/// same spelling always yields the same handle. Named records are registered
/// by `(module, name)`; anonymous records are never interned.
///
/// # Example
///
/// ```
/// use kodec_ir::{Field, Primitive, TypeGraph};
///
/// let mut graph = TypeGraph::new();
/// let string = graph.primitive(Primitive::String);
/// let user = graph.record("example.com/app/models", "User", vec![Field::new("Name", string)]);
///
/// assert_eq!(graph.lookup("example.com/app/models", "User"), Some(user));
/// assert_eq!(graph.display(user).to_string(), "models.User");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypeGraph {
    types: Vec<TypeDef>,
    interned: HashMap<TypeKind, TypeId>,
    named: HashMap<(String, String), TypeId>,
}

impl TypeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, def: TypeDef) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(def);
        id
    }

    fn intern(&mut self, kind: TypeKind) -> TypeId {
        if let Some(id) = self.interned.get(&kind) {
            return *id;
        }
        let id = self.push(TypeDef {
            module: String::new(),
            name: None,
            kind: kind.clone(),
        });
        self.interned.insert(kind, id);
        id
    }

    /// Handle for a builtin scalar.
    pub fn primitive(&mut self, primitive: Primitive) -> TypeId {
        self.intern(TypeKind::Primitive(primitive))
    }

    /// Handle for `[]elem`.
    pub fn list(&mut self, elem: TypeId) -> TypeId {
        self.intern(TypeKind::List(elem))
    }

    /// Handle for `*elem`.
    pub fn pointer(&mut self, elem: TypeId) -> TypeId {
        self.intern(TypeKind::Pointer(elem))
    }

    /// Handle for `map[key]value`.
    pub fn map(&mut self, key: TypeId, value: TypeId) -> TypeId {
        self.intern(TypeKind::Map(key, value))
    }

    /// Register a named record without fields yet.
    ///
    /// Declaring the same `(module, name)` twice returns the first handle, so
    /// self-referencing and mutually recursive records can be declared
    /// before their fields are filled in with [`TypeGraph::set_fields`].
    pub fn declare_record(&mut self, module: &str, name: &str) -> TypeId {
        let key = (module.to_string(), name.to_string());
        if let Some(id) = self.named.get(&key) {
            return *id;
        }
        let id = self.push(TypeDef {
            module: module.to_string(),
            name: Some(name.to_string()),
            kind: TypeKind::Record(Vec::new()),
        });
        self.named.insert(key, id);
        id
    }

    /// Register an unnamed record without fields yet.
    pub fn declare_anonymous(&mut self, module: &str) -> TypeId {
        self.push(TypeDef {
            module: module.to_string(),
            name: None,
            kind: TypeKind::Record(Vec::new()),
        })
    }

    /// Replace the fields of a declared record. No-op for other kinds.
    pub fn set_fields(&mut self, id: TypeId, fields: Vec<Field>) {
        if let TypeKind::Record(slot) = &mut self.types[id.index()].kind {
            *slot = fields;
        }
    }

    /// Declare a named record and set its fields in one go.
    pub fn record(&mut self, module: &str, name: &str, fields: Vec<Field>) -> TypeId {
        let id = self.declare_record(module, name);
        self.set_fields(id, fields);
        id
    }

    /// Declare an anonymous record and set its fields in one go.
    pub fn anonymous_record(&mut self, module: &str, fields: Vec<Field>) -> TypeId {
        let id = self.declare_anonymous(module);
        self.set_fields(id, fields);
        id
    }

    /// Find a named record by its canonical identity.
    pub fn lookup(&self, module: &str, name: &str) -> Option<TypeId> {
        self.named
            .get(&(module.to_string(), name.to_string()))
            .copied()
    }

    pub fn get(&self, id: TypeId) -> Option<&TypeDef> {
        self.types.get(id.index())
    }

    /// Iterate over all types in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeDef)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, def)| (TypeId(i as u32), def))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Structural spelling of a type, e.g. `[]*models.User`.
    ///
    /// Named types are qualified by the last segment of their module path.
    pub fn display(&self, id: TypeId) -> TypeDisplay<'_> {
        TypeDisplay { graph: self, id }
    }

    fn write_type(&self, f: &mut fmt::Formatter<'_>, id: TypeId, stack: &mut Vec<TypeId>) -> fmt::Result {
        let def = &self[id];
        if let Some(name) = &def.name {
            return match def.module.rsplit('/').next().filter(|m| !m.is_empty()) {
                Some(module) => write!(f, "{}.{}", module, name),
                None => f.write_str(name),
            };
        }

        match &def.kind {
            TypeKind::Primitive(p) => f.write_str(p.as_str()),
            TypeKind::List(elem) => {
                f.write_str("[]")?;
                self.write_type(f, *elem, stack)
            }
            TypeKind::Pointer(elem) => {
                f.write_str("*")?;
                self.write_type(f, *elem, stack)
            }
            TypeKind::Map(key, value) => {
                f.write_str("map[")?;
                self.write_type(f, *key, stack)?;
                f.write_str("]")?;
                self.write_type(f, *value, stack)
            }
            TypeKind::Record(fields) => {
                if stack.contains(&id) {
                    return f.write_str("struct {...}");
                }
                if fields.is_empty() {
                    return f.write_str("struct {}");
                }
                stack.push(id);
                f.write_str("struct { ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{} ", field.name)?;
                    self.write_type(f, field.ty, stack)?;
                }
                stack.pop();
                f.write_str(" }")
            }
        }
    }
}

impl Index<TypeId> for TypeGraph {
    type Output = TypeDef;

    fn index(&self, id: TypeId) -> &TypeDef {
        &self.types[id.index()]
    }
}

/// Display adapter returned by [`TypeGraph::display`].
pub struct TypeDisplay<'a> {
    graph: &'a TypeGraph,
    id: TypeId,
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.graph.write_type(f, self.id, &mut Vec::new())
    }
}
