//! Interface to the code-emission collaborators.

use eyre::Result;
use kodec_ir::TypeId;
use thiserror::Error;

use crate::EmitContext;

/// Produces the source text for a single type.
///
/// The generator calls `emit_decoder` then `emit_encoder` for every reachable
/// type, and `emit_marshaller` then `emit_unmarshaller` only for types
/// requested as top-level. Implementations append to the shared body through
/// [`EmitContext::write`] and may discover more types with
/// [`EmitContext::request_type`].
///
/// Any error aborts the run and is handed back to the caller as-is.
pub trait Emitter {
    /// Internal decode helper for `id`.
    fn emit_decoder(&mut self, ctx: &mut EmitContext<'_>, id: TypeId) -> Result<()>;

    /// Internal encode helper for `id`.
    fn emit_encoder(&mut self, ctx: &mut EmitContext<'_>, id: TypeId) -> Result<()>;

    /// Top-level marshal entry point for `id`.
    fn emit_marshaller(&mut self, ctx: &mut EmitContext<'_>, id: TypeId) -> Result<()>;

    /// Top-level unmarshal entry point for `id`.
    fn emit_unmarshaller(&mut self, ctx: &mut EmitContext<'_>, id: TypeId) -> Result<()>;
}

impl<E: Emitter + ?Sized> Emitter for &mut E {
    fn emit_decoder(&mut self, ctx: &mut EmitContext<'_>, id: TypeId) -> Result<()> {
        (**self).emit_decoder(ctx, id)
    }

    fn emit_encoder(&mut self, ctx: &mut EmitContext<'_>, id: TypeId) -> Result<()> {
        (**self).emit_encoder(ctx, id)
    }

    fn emit_marshaller(&mut self, ctx: &mut EmitContext<'_>, id: TypeId) -> Result<()> {
        (**self).emit_marshaller(ctx, id)
    }

    fn emit_unmarshaller(&mut self, ctx: &mut EmitContext<'_>, id: TypeId) -> Result<()> {
        (**self).emit_unmarshaller(ctx, id)
    }
}

/// Type shapes an emitter cannot produce code for.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmitError {
    #[error("cannot generate encoder/decoder for {ty}, not a record type")]
    NotARecord { ty: String },

    #[error("unsupported type {ty}: {reason}")]
    UnsupportedType { ty: String, reason: String },

    #[error("cannot generate entry points for unnamed type {ty}")]
    AnonymousEntryPoint { ty: String },

    #[error("cannot generate entry points for {ty}, it is declared in '{module}', not in the output package")]
    ForeignEntryPoint { ty: String, module: String },
}
