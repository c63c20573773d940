//! Lowering of a parsed manifest into a [`TypeGraph`].

use std::collections::{BTreeMap, HashSet};

use kodec_ir::{Field, TypeGraph, TypeId, TypeKind};

use crate::{Manifest, Result, TypeExpr};

/// Type graph built from a manifest, plus the seeds to generate from.
#[derive(Debug)]
pub struct Lowered {
    pub graph: TypeGraph,
    /// Declared types by table key.
    pub types: BTreeMap<String, TypeId>,
    /// Types that get marshal/unmarshal entry points.
    pub top_level: Vec<TypeId>,
}

impl Lowered {
    /// Records reachable from the top-level types through fields, in
    /// discovery order.
    pub fn reachable(&self) -> Vec<TypeId> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut stack: Vec<TypeId> = self.top_level.iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            match &self.graph[id].kind {
                TypeKind::Record(fields) => {
                    order.push(id);
                    stack.extend(fields.iter().rev().map(|f| f.ty));
                }
                TypeKind::List(elem) | TypeKind::Pointer(elem) => stack.push(*elem),
                TypeKind::Map(key, value) => stack.extend([*value, *key]),
                TypeKind::Primitive(_) => {}
            }
        }
        order
    }
}

impl Manifest {
    /// Resolve every type expression and build the type graph.
    ///
    /// Records are declared before any field is resolved, so types may refer
    /// to each other (and themselves) in any order.
    pub fn lower(&self) -> Result<Lowered> {
        let mut graph = TypeGraph::new();
        let mut types = BTreeMap::new();

        for (name, entry) in &self.types {
            let module = self.module_of(entry);
            let id = if entry.anonymous {
                graph.declare_anonymous(module)
            } else {
                graph.declare_record(module, name)
            };
            types.insert(name.clone(), id);
        }

        for (name, entry) in &self.types {
            let mut fields = Vec::with_capacity(entry.fields.len());
            for field in &entry.fields {
                let ty = self.resolve(&mut graph, &types, name, &field.ty)?;
                let lowered = Field::new(&field.name, ty);
                fields.push(match &field.tag {
                    Some(tag) => lowered.with_tag(tag),
                    None => lowered,
                });
            }
            graph.set_fields(types[name], fields);
        }

        let top_level = self.top_level().map(|name| types[name]).collect();

        Ok(Lowered {
            graph,
            types,
            top_level,
        })
    }

    fn resolve(
        &self,
        graph: &mut TypeGraph,
        types: &BTreeMap<String, TypeId>,
        owner: &str,
        expr: &TypeExpr,
    ) -> Result<TypeId> {
        Ok(match expr {
            TypeExpr::Primitive(p) => graph.primitive(*p),
            TypeExpr::Named(name) => match types.get(name) {
                Some(id) => *id,
                None => {
                    let section = self.source.find_key_span(owner);
                    let from = section.map(|s| s.offset()).unwrap_or(0);
                    let span = self.source.find_text_span(name, from).or(section);
                    return Err(self.source.unknown_type_error(name, owner, span));
                }
            },
            TypeExpr::List(elem) => {
                let elem = self.resolve(graph, types, owner, elem)?;
                graph.list(elem)
            }
            TypeExpr::Pointer(elem) => {
                let elem = self.resolve(graph, types, owner, elem)?;
                graph.pointer(elem)
            }
            TypeExpr::Map(key, value) => {
                let key = self.resolve(graph, types, owner, key)?;
                let value = self.resolve(graph, types, owner, value)?;
                graph.map(key, value)
            }
        })
    }
}
