//! Type graph types for the kodec generator.
//!
//! The generator never reflects over a live type system. Instead an adapter
//! (the manifest loader, or a test) builds a [`TypeGraph`] ahead of time and
//! hands out [`TypeId`] handles into it.
//!
//! # Architecture
//!
//! ```text
//! kodec.toml (TOML) → kodec-manifest (parsing) → kodec-ir (TypeGraph) → codegen
//! ```
//!
//! Handles compare by identity: two anonymous records with identical fields
//! are still distinct types.

mod graph;
mod types;

pub use graph::{TypeDisplay, TypeGraph, TypeId};
pub use types::{Field, Primitive, TypeDef, TypeKind};
