//! Per-run state shared between the generator and its emitter.

use kodec_ir::{Field, TypeDef, TypeGraph, TypeId, TypeKind};
use tracing::trace;

use crate::{AliasTable, EmitError, FieldNamer, SymbolTable, VerbatimNamer, Worklist};

/// Name and path of the package the generated file belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    /// Package name used in the `package` clause.
    pub name: String,
    /// Module path; types declared here are referenced without an alias.
    pub path: String,
}

impl Default for PackageSpec {
    fn default() -> Self {
        Self {
            name: "main".to_string(),
            path: String::new(),
        }
    }
}

/// Everything a generation run owns: the traversal worklist, the naming
/// registries, configuration and the output body.
///
/// One context belongs to exactly one run. Emitters receive it mutably for
/// the duration of each callback.
pub struct EmitContext<'g> {
    graph: &'g TypeGraph,
    pub(crate) package: PackageSpec,
    pub(crate) build_tags: Option<String>,
    pub(crate) omit_empty: bool,
    pub(crate) namer: Box<dyn FieldNamer>,
    pub(crate) imports: AliasTable,
    symbols: SymbolTable,
    pub(crate) worklist: Worklist,
    var_counter: u32,
    body: String,
}

impl<'g> EmitContext<'g> {
    pub fn new(graph: &'g TypeGraph) -> Self {
        Self {
            graph,
            package: PackageSpec::default(),
            build_tags: None,
            omit_empty: false,
            namer: Box::new(VerbatimNamer),
            imports: AliasTable::new(),
            symbols: SymbolTable::new(),
            worklist: Worklist::new(),
            var_counter: 0,
            body: String::new(),
        }
    }

    /// The type graph this run walks.
    pub fn graph(&self) -> &'g TypeGraph {
        self.graph
    }

    /// Definition of a type.
    pub fn def(&self, id: TypeId) -> &'g TypeDef {
        let graph = self.graph;
        &graph[id]
    }

    pub fn package(&self) -> &PackageSpec {
        &self.package
    }

    /// Whether fields are omitted when empty unless told otherwise.
    pub fn omit_empty(&self) -> bool {
        self.omit_empty
    }

    /// Ask for codec helpers for a type discovered while emitting another.
    pub fn request_type(&mut self, id: TypeId) {
        if self.worklist.request(id) {
            trace!(ty = %self.graph.display(id), "discovered type");
        }
    }

    /// Whether entry points were requested for `id`.
    pub fn is_top_level(&self, id: TypeId) -> bool {
        self.worklist.is_top_level(id)
    }

    /// Unique name of the generated function with `prefix` for `id`.
    pub fn function_name(&mut self, prefix: &str, id: TypeId) -> String {
        self.symbols.function_name(prefix, id, &self.graph[id])
    }

    /// Import alias for a module path.
    pub fn alias_for(&mut self, path: &str) -> String {
        self.imports.alias_for(path)
    }

    /// JSON key for a field of `owner` under the configured naming policy.
    pub fn field_name(&self, owner: TypeId, field: &Field) -> String {
        self.namer.field_name(&self.graph[owner], field)
    }

    /// A fresh local variable name (`v1`, `v2`, ...).
    pub fn unique_var_name(&mut self) -> String {
        self.var_counter += 1;
        format!("v{}", self.var_counter)
    }

    /// Spelling of a type usable in generated code.
    ///
    /// Named types from the output package are referenced bare, named types
    /// from other modules through their import alias, and unnamed types
    /// structurally.
    ///
    /// # Errors
    ///
    /// An unnamed record that contains itself has no spelling and is
    /// rejected with [`EmitError::UnsupportedType`].
    pub fn type_ref(&mut self, id: TypeId) -> Result<String, EmitError> {
        self.type_ref_inner(id, &mut Vec::new())
    }

    fn type_ref_inner(
        &mut self,
        id: TypeId,
        stack: &mut Vec<TypeId>,
    ) -> Result<String, EmitError> {
        let graph = self.graph;
        let def = &graph[id];
        if let Some(name) = &def.name {
            if def.module.is_empty() || def.module == self.package.path {
                return Ok(name.clone());
            }
            return Ok(format!("{}.{}", self.alias_for(&def.module), name));
        }

        Ok(match &def.kind {
            TypeKind::Primitive(p) => p.as_str().to_string(),
            TypeKind::List(elem) => format!("[]{}", self.type_ref_inner(*elem, stack)?),
            TypeKind::Pointer(elem) => format!("*{}", self.type_ref_inner(*elem, stack)?),
            TypeKind::Map(key, value) => {
                let key = self.type_ref_inner(*key, stack)?;
                let value = self.type_ref_inner(*value, stack)?;
                format!("map[{}]{}", key, value)
            }
            TypeKind::Record(fields) => {
                if stack.contains(&id) {
                    return Err(EmitError::UnsupportedType {
                        ty: graph.display(id).to_string(),
                        reason: "unnamed record refers to itself".to_string(),
                    });
                }
                if fields.is_empty() {
                    return Ok("struct{}".to_string());
                }
                stack.push(id);
                let mut parts = Vec::with_capacity(fields.len());
                for f in fields {
                    parts.push(format!("{} {}", f.name, self.type_ref_inner(f.ty, stack)?));
                }
                stack.pop();
                format!("struct {{ {} }}", parts.join("; "))
            }
        })
    }

    /// Append generated code to the body.
    pub fn write(&mut self, code: &str) {
        self.body.push_str(code);
    }

    /// The body accumulated so far.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub(crate) fn into_body(self) -> String {
        self.body
    }
}

#[cfg(test)]
mod tests {
    use kodec_ir::Primitive;

    use super::*;

    const MODELS: &str = "example.com/app/models";

    #[test]
    fn test_unique_var_names() {
        let graph = TypeGraph::new();
        let mut ctx = EmitContext::new(&graph);
        assert_eq!(ctx.unique_var_name(), "v1");
        assert_eq!(ctx.unique_var_name(), "v2");
        assert_eq!(ctx.unique_var_name(), "v3");
    }

    #[test]
    fn test_type_ref() {
        let mut graph = TypeGraph::new();
        let int = graph.primitive(Primitive::Int);
        let user = graph.record(MODELS, "User", Vec::new());
        let other = graph.record("example.com/lib/geo", "Point", Vec::new());
        let points = graph.list(other);
        let by_id = graph.map(int, user);
        let ptr = graph.pointer(user);
        let anon = graph.anonymous_record(MODELS, vec![Field::new("A", int), Field::new("P", ptr)]);

        let mut ctx = EmitContext::new(&graph);
        ctx.package = PackageSpec {
            name: "models".to_string(),
            path: MODELS.to_string(),
        };

        assert_eq!(ctx.type_ref(int).unwrap(), "int");
        assert_eq!(ctx.type_ref(user).unwrap(), "User");
        assert_eq!(ctx.type_ref(other).unwrap(), "geo.Point");
        assert_eq!(ctx.type_ref(points).unwrap(), "[]geo.Point");
        assert_eq!(ctx.type_ref(by_id).unwrap(), "map[int]User");
        assert_eq!(ctx.type_ref(anon).unwrap(), "struct { A int; P *User }");
        assert_eq!(ctx.imports.get("example.com/lib/geo"), Some("geo"));
    }

    #[test]
    fn test_write_appends_to_body() {
        let graph = TypeGraph::new();
        let mut ctx = EmitContext::new(&graph);
        ctx.write("a\n");
        ctx.write("b\n");
        assert_eq!(ctx.body(), "a\nb\n");
    }

    #[test]
    fn test_type_ref_rejects_self_containing_unnamed_record() {
        let mut graph = TypeGraph::new();
        let anon = graph.declare_anonymous(MODELS);
        let next = graph.pointer(anon);
        graph.set_fields(anon, vec![Field::new("Next", next)]);
        let empty = graph.anonymous_record(MODELS, Vec::new());

        let mut ctx = EmitContext::new(&graph);
        assert!(matches!(
            ctx.type_ref(anon),
            Err(EmitError::UnsupportedType { .. })
        ));
        assert!(matches!(
            ctx.type_ref(next),
            Err(EmitError::UnsupportedType { .. })
        ));
        assert_eq!(ctx.type_ref(empty).unwrap(), "struct{}");
    }
}
