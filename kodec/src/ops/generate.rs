//! Generate operation - runs the codec generator over a lowered manifest.

use eyre::{Context, Result};
use kodec_codegen::{Generator, SkeletonEmitter};
use kodec_manifest::{FieldNaming, Lowered, Manifest};
use tracing::{debug, warn};

use crate::reports::GenerateReport;

/// Command-line overrides applied on top of the `[package]` table.
#[derive(Debug, Default, Clone)]
pub struct GenerateOptions {
    pub snake_case: bool,
    pub omit_empty: bool,
    pub build_tags: Option<String>,
}

/// Execute the generate operation.
///
/// Returns the generated source together with a summary of the types it
/// covers. Nothing is written to disk here.
pub fn generate(
    manifest: &Manifest,
    lowered: &Lowered,
    options: &GenerateOptions,
) -> Result<(String, GenerateReport)> {
    let package = &manifest.package;
    let mut generator = Generator::new(&lowered.graph, SkeletonEmitter::new());
    generator.set_package(&package.name, &package.path);

    if let Some(tags) = options.build_tags.as_ref().or(package.build_tags.as_ref()) {
        generator.set_build_tags(tags.as_str());
    }
    if options.omit_empty || package.omit_empty {
        generator.omit_empty();
    }
    if options.snake_case || package.field_naming == FieldNaming::SnakeCase {
        generator.use_snake_case();
    }

    if lowered.top_level.is_empty() {
        warn!("no top-level types declared, only the file header will be generated");
    }
    for id in &lowered.top_level {
        debug!(ty = %lowered.graph.display(*id), "requesting entry points");
        generator.request_top_level(*id);
    }

    let source = generator.run().wrap_err("failed to generate codecs")?;

    let report = GenerateReport {
        package: package.name.clone(),
        top_level: display_all(lowered, &lowered.top_level),
        nested: display_all(
            lowered,
            lowered
                .reachable()
                .iter()
                .filter(|id| !lowered.top_level.contains(*id)),
        ),
        output: None,
    };

    Ok((source, report))
}

fn display_all<'a>(
    lowered: &Lowered,
    ids: impl IntoIterator<Item = &'a kodec_ir::TypeId>,
) -> Vec<String> {
    ids.into_iter()
        .map(|id| lowered.graph.display(*id).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
[package]
name = "models"
path = "example.com/app/models"

[types.User]
top_level = true
fields = [
  { name = "FullName", type = "string" },
  { name = "Home", type = "*Address" },
]

[types.Address]
fields = [{ name = "ZipCode", type = "string" }]
"#;

    fn run(src: &str, options: &GenerateOptions) -> (String, GenerateReport) {
        let manifest: Manifest = src.parse().unwrap();
        let lowered = manifest.lower().unwrap();
        generate(&manifest, &lowered, options).unwrap()
    }

    #[test]
    fn test_generate_report() {
        let (source, report) = run(MANIFEST, &GenerateOptions::default());

        assert!(source.starts_with("// Code generated by kodec"));
        assert!(source.contains("package models\n"));
        assert!(source.contains("case \"FullName\":"));
        assert!(source.contains("func (v User) MarshalJSON() ([]byte, error) {"));
        assert_eq!(report.package, "models");
        assert_eq!(report.top_level, vec!["models.User"]);
        assert_eq!(report.nested, vec!["models.Address"]);
    }

    #[test]
    fn test_cli_overrides() {
        let options = GenerateOptions {
            snake_case: true,
            omit_empty: true,
            build_tags: Some("!js".to_string()),
        };
        let (source, _) = run(MANIFEST, &options);

        assert!(source.contains("//go:build !js\n"));
        assert!(source.contains("case \"full_name\":"));
        assert!(source.contains("case \"zip_code\":"));
        assert!(source.contains("if in.Home != nil {"));
    }

    #[test]
    fn test_manifest_settings() {
        let src = MANIFEST.replace(
            "path = \"example.com/app/models\"",
            "path = \"example.com/app/models\"\nfield_naming = \"snake_case\"\nbuild_tags = \"linux\"",
        );
        let (source, _) = run(&src, &GenerateOptions::default());
        assert!(source.contains("//go:build linux\n"));
        assert!(source.contains("case \"full_name\":"));

        let options = GenerateOptions {
            build_tags: Some("darwin".to_string()),
            ..Default::default()
        };
        let (source, _) = run(&src, &options);
        assert!(source.contains("//go:build darwin\n"));
        assert!(!source.contains("//go:build linux"));
    }

    #[test]
    fn test_emitter_errors_are_wrapped() {
        let src = r#"
[package]
name = "models"

[types.Index]
top_level = true
fields = [{ name = "ById", type = "map[int]string" }]
"#;
        let manifest: Manifest = src.parse().unwrap();
        let lowered = manifest.lower().unwrap();
        let err = generate(&manifest, &lowered, &GenerateOptions::default()).unwrap_err();

        assert_eq!(err.to_string(), "failed to generate codecs");
        assert!(format!("{:?}", err).contains("map keys must be strings"));
    }
}
