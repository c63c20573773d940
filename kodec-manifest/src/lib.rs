//! `kodec.toml` manifest parsing and lowering.
//!
//! A manifest names the output package and declares the record types to
//! generate codecs for. [`Manifest::lower`] turns it into a
//! [`kodec_ir::TypeGraph`] plus the list of top-level seed types.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
mod lower;
mod manifest;
mod type_expr;
mod validate;

pub use error::{Error, Result, SourceContext};
pub use lower::Lowered;
pub use manifest::{FieldEntry, FieldNaming, Manifest, PackageConfig, TypeEntry};
pub use type_expr::TypeExpr;
