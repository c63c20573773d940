use std::path::PathBuf;

use clap::Args;
use eyre::{Context, Result};
use kodec_manifest::Manifest;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    /// Path to kodec.toml (defaults to ./kodec.toml)
    #[arg(short, long, default_value = "kodec.toml")]
    pub config: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let manifest = Manifest::from_file(&self.config).unwrap_or_exit();
        let lowered = manifest.lower().unwrap_or_exit();

        let report = ops::check(&manifest, &lowered, &self.config);

        if self.json {
            let json = serde_json::to_string_pretty(&report).wrap_err("failed to serialize report")?;
            println!("{}", json);
        } else {
            report.render(&mut TerminalOutput::new());
        }
        Ok(())
    }
}
