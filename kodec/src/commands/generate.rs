use std::path::PathBuf;

use clap::Args;
use eyre::{Context, Result};
use kodec_core::{OutputFile, WriteResult};
use kodec_manifest::Manifest;

use super::UnwrapOrExit;
use crate::{
    ops::{self, GenerateOptions},
    reports::{OutputStatus, Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    /// Path to kodec.toml (defaults to ./kodec.toml)
    #[arg(short, long, default_value = "kodec.toml")]
    pub config: PathBuf,

    /// Output file (defaults to <package>_kodec.go)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print generated code to stdout without writing to disk
    #[arg(long)]
    pub dry_run: bool,

    /// Use snake_case JSON keys regardless of the manifest
    #[arg(long)]
    pub snake_case: bool,

    /// Omit empty values in every encoder
    #[arg(long)]
    pub omit_empty: bool,

    /// Build constraint for the generated file, overriding the manifest
    #[arg(long, value_name = "TAGS")]
    pub build_tags: Option<String>,
}

impl GenerateCommand {
    /// Run the generate command
    pub fn run(&self) -> Result<()> {
        let manifest = Manifest::from_file(&self.config).unwrap_or_exit();
        let lowered = manifest.lower().unwrap_or_exit();

        let options = GenerateOptions {
            snake_case: self.snake_case,
            omit_empty: self.omit_empty,
            build_tags: self.build_tags.clone(),
        };
        let (source, mut report) = ops::generate(&manifest, &lowered, &options)?;

        if self.dry_run {
            print!("{}", source);
            return Ok(());
        }

        let path = self
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}_kodec.go", manifest.package.name)));
        let file = OutputFile::new(&path, source);
        let status = match file
            .write()
            .wrap_err_with(|| format!("failed to write {}", path.display()))?
        {
            WriteResult::Written => OutputStatus::Written(path),
            WriteResult::Unchanged => OutputStatus::Unchanged(path),
        };
        report.output = Some(status);

        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
