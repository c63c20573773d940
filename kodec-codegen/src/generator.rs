//! Generation run orchestrator.

use eyre::Result;
use kodec_ir::{TypeGraph, TypeId};
use tracing::{debug, info};

use crate::{CodeBuilder, EmitContext, Emitter, FieldNamer, PackageSpec, SnakeCaseNamer};

/// Drives the fixed-point traversal and assembles the generated file.
///
/// Callers register seed types, configure the output, then call
/// [`Generator::run`], which consumes the generator: the output is handed
/// out once, and only if every emitter call succeeded.
///
/// # Example
///
/// ```ignore
/// let mut generator = Generator::new(&graph, SkeletonEmitter::new());
/// generator.set_package("models", "example.com/app/models");
/// generator.use_snake_case();
/// generator.request_top_level(user);
///
/// let source = generator.run()?;
/// ```
pub struct Generator<'g, E> {
    ctx: EmitContext<'g>,
    emitter: E,
}

impl<'g, E: Emitter> Generator<'g, E> {
    pub fn new(graph: &'g TypeGraph, emitter: E) -> Self {
        Self {
            ctx: EmitContext::new(graph),
            emitter,
        }
    }

    /// Set the name and module path of the output package.
    pub fn set_package(&mut self, name: impl Into<String>, path: impl Into<String>) {
        self.ctx.package = PackageSpec {
            name: name.into(),
            path: path.into(),
        };
    }

    /// Set the build constraint written at the top of the file.
    pub fn set_build_tags(&mut self, tags: impl Into<String>) {
        let tags = tags.into();
        self.ctx.build_tags = (!tags.is_empty()).then_some(tags);
    }

    /// Omit empty fields by default.
    pub fn omit_empty(&mut self) {
        self.ctx.omit_empty = true;
    }

    /// Set the field naming policy.
    pub fn set_field_namer(&mut self, namer: impl FieldNamer + 'static) {
        self.ctx.namer = Box::new(namer);
    }

    /// Use snake_case field names.
    pub fn use_snake_case(&mut self) {
        self.set_field_namer(SnakeCaseNamer);
    }

    /// Request codec helpers for a type.
    pub fn request_type(&mut self, id: TypeId) {
        self.ctx.request_type(id);
    }

    /// Request codec helpers and entry points for a type.
    pub fn request_top_level(&mut self, id: TypeId) {
        self.ctx.worklist.request_top_level(id);
    }

    /// Run the traversal to its fixed point and return the generated file.
    ///
    /// Pending types are processed last-in-first-out; the resulting order of
    /// codecs in the body is deterministic for a given sequence of requests.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by the emitter, unchanged.
    pub fn run(self) -> Result<String> {
        let Self {
            mut ctx,
            mut emitter,
        } = self;

        while let Some(id) = ctx.worklist.pop() {
            debug!(ty = %ctx.graph().display(id), "generating codec");

            emitter.emit_decoder(&mut ctx, id)?;
            emitter.emit_encoder(&mut ctx, id)?;

            if !ctx.worklist.is_top_level(id) {
                continue;
            }

            emitter.emit_marshaller(&mut ctx, id)?;
            emitter.emit_unmarshaller(&mut ctx, id)?;
        }

        info!(
            types = ctx.worklist.seen_count(),
            imports = ctx.imports.len(),
            "generation finished"
        );

        let mut out = render_header(&ctx);
        out.push_str(&ctx.into_body());
        Ok(out)
    }
}

/// Package clause, build constraint and sorted import block.
fn render_header(ctx: &EmitContext<'_>) -> String {
    CodeBuilder::new()
        .comment("Code generated by kodec for marshaling/unmarshaling. DO NOT EDIT.")
        .blank()
        .when_some(ctx.build_tags.as_deref(), |b, tags| {
            b.line(&format!("//go:build {}", tags)).blank()
        })
        .line(&format!("package {}", ctx.package.name))
        .blank()
        .line("import (")
        .indent()
        .each(ctx.imports.sorted(), |b, (alias, path)| {
            b.line(&format!("{} \"{}\"", alias, path))
        })
        .dedent()
        .line(")")
        .blank()
        .line("var _ = json.RawMessage{} // suppress unused package warning")
        .blank()
        .build()
}
