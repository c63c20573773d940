//! Core utilities and types for the kodec generator.
//!
//! This crate provides the string transforms and file helpers shared
//! across the kodec workspace.

mod file;
mod utils;

// File operations
pub use file::{OutputFile, WriteResult};
// String utilities
pub use utils::{camel_to_snake, go_string_literal, json_string_literal, last_path_segment};
