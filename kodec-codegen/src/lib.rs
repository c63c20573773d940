//! Orchestration core of the kodec JSON codec generator.
//!
//! Given seed types from a [`kodec_ir::TypeGraph`], the [`Generator`] walks
//! every record reachable through fields, asks an [`Emitter`] for codec
//! helpers (and entry points for top-level types), and assembles the output
//! file with its package clause and import block.
//!
//! # Module Organization
//!
//! - [`generator`] - Fixed-point run and header rendering
//! - [`traversal`] - Pending/seen worklist
//! - [`symbols`] - Collision-free generated function names
//! - [`imports`] - Import alias allocation
//! - [`naming`] - Field naming policies
//! - [`skeleton`] - Reference emitter

pub mod builder;
mod context;
mod emitter;
pub mod generator;
pub mod imports;
pub mod naming;
pub mod skeleton;
pub mod symbols;
pub mod traversal;

pub use builder::CodeBuilder;
pub use context::{EmitContext, PackageSpec};
pub use emitter::{EmitError, Emitter};
pub use generator::Generator;
pub use imports::AliasTable;
pub use naming::{FieldNamer, SnakeCaseNamer, VerbatimNamer};
pub use skeleton::SkeletonEmitter;
pub use symbols::SymbolTable;
pub use traversal::Worklist;
