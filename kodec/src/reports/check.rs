//! Check command report data structures.

use std::path::PathBuf;

use kodec_manifest::FieldNaming;
use serde::Serialize;

use super::output::{Output, Report};

/// Report data from manifest validation.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    /// Path to the config file.
    pub config_path: PathBuf,
    pub package: String,
    pub path: String,
    pub field_naming: FieldNaming,
    /// Declared types, sorted by name.
    pub types: Vec<TypeSummary>,
    pub warnings: Vec<String>,
}

/// One `[types.<Name>]` entry.
#[derive(Debug, Serialize)]
pub struct TypeSummary {
    pub name: String,
    pub module: String,
    pub top_level: bool,
    pub anonymous: bool,
    pub fields: usize,
    /// Whether any top-level type reaches it through fields.
    pub reachable: bool,
}

impl CheckReport {
    pub fn reachable_count(&self) -> usize {
        self.types.iter().filter(|ty| ty.reachable).count()
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for warning in &self.warnings {
            out.warning(warning);
        }
        if !self.warnings.is_empty() {
            out.blank();
        }

        out.note(&format!("✓ {} is valid", self.config_path.display()));
        out.blank();

        let path = if self.path.is_empty() {
            String::new()
        } else {
            format!(" ({})", self.path)
        };
        out.field("package", &format!("{}{}", self.package, path));
        out.blank();

        let count = self.types.len();
        out.heading(&format!(
            "{} type{}, {} reachable",
            count,
            if count == 1 { "" } else { "s" },
            self.reachable_count()
        ));
        for ty in &self.types {
            let mut flags = Vec::new();
            if ty.top_level {
                flags.push("top-level");
            }
            if ty.anonymous {
                flags.push("anonymous");
            }
            let flags = if flags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", flags.join(", "))
            };
            out.item(&format!(
                "{} ({} field{}){}",
                ty.name,
                ty.fields,
                if ty.fields == 1 { "" } else { "s" },
                flags
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::BufferOutput;

    #[test]
    fn test_render() {
        let report = CheckReport {
            config_path: PathBuf::from("kodec.toml"),
            package: "models".to_string(),
            path: "example.com/app/models".to_string(),
            field_naming: FieldNaming::Verbatim,
            types: vec![
                TypeSummary {
                    name: "Tag".to_string(),
                    module: "example.com/app/models".to_string(),
                    top_level: false,
                    anonymous: false,
                    fields: 1,
                    reachable: false,
                },
                TypeSummary {
                    name: "User".to_string(),
                    module: "example.com/app/models".to_string(),
                    top_level: true,
                    anonymous: false,
                    fields: 3,
                    reachable: true,
                },
            ],
            warnings: vec!["type 'Tag' is not reachable from any top-level type".to_string()],
        };

        let mut out = BufferOutput::default();
        report.render(&mut out);

        assert_eq!(
            out.lines,
            vec![
                "warning: type 'Tag' is not reachable from any top-level type",
                "",
                "✓ kodec.toml is valid",
                "",
                "package: models (example.com/app/models)",
                "",
                "2 types, 1 reachable:",
                "  - Tag (1 field)",
                "  - User (3 fields) [top-level]",
            ]
        );
    }
}
