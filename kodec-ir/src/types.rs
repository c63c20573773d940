//! Core type definitions.

use std::{fmt, str::FromStr};

use crate::TypeId;

/// Builtin scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    String,
}

impl Primitive {
    pub const ALL: [Primitive; 14] = [
        Primitive::Bool,
        Primitive::Int,
        Primitive::Int8,
        Primitive::Int16,
        Primitive::Int32,
        Primitive::Int64,
        Primitive::Uint,
        Primitive::Uint8,
        Primitive::Uint16,
        Primitive::Uint32,
        Primitive::Uint64,
        Primitive::Float32,
        Primitive::Float64,
        Primitive::String,
    ];

    /// Get the spelling used in generated source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::Int => "int",
            Primitive::Int8 => "int8",
            Primitive::Int16 => "int16",
            Primitive::Int32 => "int32",
            Primitive::Int64 => "int64",
            Primitive::Uint => "uint",
            Primitive::Uint8 => "uint8",
            Primitive::Uint16 => "uint16",
            Primitive::Uint32 => "uint32",
            Primitive::Uint64 => "uint64",
            Primitive::Float32 => "float32",
            Primitive::Float64 => "float64",
            Primitive::String => "string",
        }
    }

    /// Name of the lexer/writer method handling this primitive
    /// (e.g. `Int64`, `String`).
    pub fn method_name(&self) -> &'static str {
        match self {
            Primitive::Bool => "Bool",
            Primitive::Int => "Int",
            Primitive::Int8 => "Int8",
            Primitive::Int16 => "Int16",
            Primitive::Int32 => "Int32",
            Primitive::Int64 => "Int64",
            Primitive::Uint => "Uint",
            Primitive::Uint8 => "Uint8",
            Primitive::Uint16 => "Uint16",
            Primitive::Uint32 => "Uint32",
            Primitive::Uint64 => "Uint64",
            Primitive::Float32 => "Float32",
            Primitive::Float64 => "Float64",
            Primitive::String => "String",
        }
    }

    /// The literal a value of this type is compared against for emptiness.
    pub fn zero_literal(&self) -> &'static str {
        match self {
            Primitive::Bool => "false",
            Primitive::String => "\"\"",
            _ => "0",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Primitive {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Primitive::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or(())
    }
}

/// A named field of a record type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    /// Declared identifier (e.g. `UserName`).
    pub name: String,
    /// Field type.
    pub ty: TypeId,
    /// Raw annotation string, e.g. `"uname,omitempty"`.
    pub tag: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            tag: None,
        }
    }

    /// Attach an annotation string.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// The explicit name override carried by the annotation, if any.
    ///
    /// The annotation is split on `,` or `;` and the first component is the
    /// name. An empty first component means "no override".
    pub fn tag_name(&self) -> Option<&str> {
        let tag = self.tag.as_deref()?;
        let name = tag.split([',', ';']).next().unwrap_or_default();
        (!name.is_empty()).then_some(name)
    }

    /// Check whether the annotation carries the given option after the name.
    pub fn has_tag_option(&self, option: &str) -> bool {
        self.tag
            .as_deref()
            .is_some_and(|tag| tag.split([',', ';']).skip(1).any(|o| o.trim() == option))
    }
}

/// Shape of a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Builtin scalar.
    Primitive(Primitive),
    /// Record with named fields.
    Record(Vec<Field>),
    /// Variable-length sequence.
    List(TypeId),
    /// Nullable reference.
    Pointer(TypeId),
    /// Key/value mapping.
    Map(TypeId, TypeId),
}

/// A type in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    /// Module path the type is declared in. Empty for builtins and
    /// structural types.
    pub module: String,
    /// Local name. `None` for unnamed types.
    pub name: Option<String>,
    /// Shape of the type.
    pub kind: TypeKind,
}

impl TypeDef {
    /// Returns true if this is a record type.
    pub fn is_record(&self) -> bool {
        matches!(self.kind, TypeKind::Record(_))
    }

    /// Fields of a record type, empty for anything else.
    pub fn fields(&self) -> &[Field] {
        match &self.kind {
            TypeKind::Record(fields) => fields,
            _ => &[],
        }
    }
}
