//! Generate command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// What happened to the output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputStatus {
    Written(PathBuf),
    Unchanged(PathBuf),
}

/// Report data from a generation run.
#[derive(Debug)]
pub struct GenerateReport {
    pub package: String,
    /// Types with marshal/unmarshal entry points.
    pub top_level: Vec<String>,
    /// Types generated only as helpers.
    pub nested: Vec<String>,
    /// Unset for dry runs.
    pub output: Option<OutputStatus>,
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        out.field("package", &self.package);
        out.blank();

        out.heading(&format!("Entry points ({})", self.top_level.len()));
        for ty in &self.top_level {
            out.item(ty);
        }
        if !self.nested.is_empty() {
            out.heading(&format!("Helpers only ({})", self.nested.len()));
            for ty in &self.nested {
                out.item(ty);
            }
        }

        match &self.output {
            Some(OutputStatus::Written(path)) => {
                out.blank();
                out.written(&path.display().to_string());
            }
            Some(OutputStatus::Unchanged(path)) => {
                out.blank();
                out.note(&format!("{} is up to date", path.display()));
            }
            None => {}
        }
    }
}
