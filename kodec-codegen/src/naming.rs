//! Field naming policies.

use kodec_core::camel_to_snake;
use kodec_ir::{Field, TypeDef};

/// Policy deciding the externally visible (JSON) name of a record field.
///
/// Implement this trait to plug a custom naming scheme into the generator.
pub trait FieldNamer {
    /// JSON key for `field` of the record `owner`.
    fn field_name(&self, owner: &TypeDef, field: &Field) -> String;
}

/// Uses the declared identifier as-is, unless the annotation overrides it.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerbatimNamer;

impl FieldNamer for VerbatimNamer {
    fn field_name(&self, _owner: &TypeDef, field: &Field) -> String {
        match field.tag_name() {
            Some(name) => name.to_string(),
            None => field.name.clone(),
        }
    }
}

/// Converts the declared identifier to snake_case, unless the annotation
/// overrides it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnakeCaseNamer;

impl FieldNamer for SnakeCaseNamer {
    fn field_name(&self, _owner: &TypeDef, field: &Field) -> String {
        match field.tag_name() {
            Some(name) => name.to_string(),
            None => camel_to_snake(&field.name),
        }
    }
}
