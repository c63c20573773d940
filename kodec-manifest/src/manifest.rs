use std::{collections::BTreeMap, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, SourceContext, TypeExpr};

/// Root manifest for kodec.toml
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Output package settings
    pub package: PackageConfig,

    /// Declared record types, keyed by local name
    #[serde(default)]
    pub types: BTreeMap<String, TypeEntry>,

    #[serde(skip)]
    pub(crate) source: SourceContext,
}

/// `[package]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageConfig {
    /// Package clause of the generated file
    pub name: String,

    /// Module path of the generated file; types without `module` live here
    #[serde(default)]
    pub path: String,

    /// Build constraint expression, e.g. `!js`
    pub build_tags: Option<String>,

    #[serde(default)]
    pub field_naming: FieldNaming,

    /// Skip empty values in every encoder
    #[serde(default)]
    pub omit_empty: bool,
}

/// Built-in JSON key policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldNaming {
    /// Keys are the declared field names.
    #[default]
    Verbatim,
    /// Keys are snake_cased field names.
    SnakeCase,
}

/// `[types.<Name>]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeEntry {
    /// Module path declaring the type (defaults to `package.path`)
    pub module: Option<String>,

    /// Generate `MarshalJSON` / `UnmarshalJSON` entry points
    #[serde(default)]
    pub top_level: bool,

    /// Unnamed record; the table key is only a handle for references
    #[serde(default)]
    pub anonymous: bool,

    #[serde(default)]
    pub fields: Vec<FieldEntry>,
}

/// One record field.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldEntry {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: TypeExpr,

    /// Raw `json` tag, e.g. `"id,omitempty"`
    pub tag: Option<String>,
}

impl FromStr for Manifest {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_with_filename(s, "kodec.toml")
    }
}

impl Manifest {
    /// Parse a kodec.toml file from the given path
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        Self::from_str_with_filename(&content, &path.display().to_string())
    }

    /// Parse a kodec.toml from a string with a custom filename for error reporting
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        let source = SourceContext::new(content, filename);
        let mut manifest: Self = toml::from_str(content).map_err(|e| source.parse_error(e))?;
        manifest.source = source;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Source the manifest was parsed from.
    pub fn source(&self) -> &SourceContext {
        &self.source
    }

    /// Module path of a declared type.
    pub fn module_of<'a>(&'a self, entry: &'a TypeEntry) -> &'a str {
        entry.module.as_deref().unwrap_or(&self.package.path)
    }

    /// Names of the types requested with `top_level = true`.
    pub fn top_level(&self) -> impl Iterator<Item = &str> {
        self.types
            .iter()
            .filter(|(_, entry)| entry.top_level)
            .map(|(name, _)| name.as_str())
    }

    /// Validate the manifest after parsing
    fn validate(&self) -> Result<()> {
        let ctx = &self.source;

        if self.package.name.trim().is_empty() {
            let span = ctx.find_quoted_spans("", 0).into_iter().next();
            return Err(ctx.validation_error("package name cannot be empty", span));
        }
        let span = ctx.find_quoted_spans(&self.package.name, 0).into_iter().next();
        ctx.validate_name(&self.package.name, "package", span)?;

        for (name, entry) in &self.types {
            let key_span = ctx.find_key_span(name);
            ctx.validate_name(name, "type", key_span)?;

            let section = key_span.map(|s| s.offset()).unwrap_or(0);
            let mut seen: Vec<&str> = Vec::new();
            for field in &entry.fields {
                let spans = ctx.find_quoted_spans(&field.name, section);
                ctx.validate_name(&field.name, "field", spans.first().copied())?;

                if seen.contains(&field.name.as_str()) {
                    return Err(ctx.duplicate_field_error(
                        &field.name,
                        name,
                        spans.first().copied(),
                        spans.get(1).copied(),
                    ));
                }
                seen.push(&field.name);
            }

            if entry.top_level && entry.anonymous {
                return Err(ctx.validation_error(
                    format!("anonymous type '{}' cannot be top-level", name),
                    key_span,
                ));
            }
        }

        Ok(())
    }
}
