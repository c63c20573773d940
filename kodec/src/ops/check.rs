//! Check operation - manifest validation and type summary.

use std::path::Path;

use kodec_manifest::{Lowered, Manifest};

use crate::reports::{CheckReport, TypeSummary};

/// Execute the check operation.
///
/// Parsing and lowering already reported hard errors; this collects the
/// summary and flags declared types no top-level type reaches.
pub fn check(manifest: &Manifest, lowered: &Lowered, config_path: &Path) -> CheckReport {
    let reachable = lowered.reachable();

    let types = manifest
        .types
        .iter()
        .map(|(name, entry)| TypeSummary {
            name: name.clone(),
            module: manifest.module_of(entry).to_string(),
            top_level: entry.top_level,
            anonymous: entry.anonymous,
            fields: entry.fields.len(),
            reachable: reachable.contains(&lowered.types[name]),
        })
        .collect::<Vec<_>>();

    let warnings = types
        .iter()
        .filter(|ty| !ty.reachable)
        .map(|ty| format!("type '{}' is not reachable from any top-level type", ty.name))
        .collect();

    CheckReport {
        config_path: config_path.to_path_buf(),
        package: manifest.package.name.clone(),
        path: manifest.package.path.clone(),
        field_naming: manifest.package.field_naming,
        types,
        warnings,
    }
}
