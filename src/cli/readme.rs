use std::{fs, path::PathBuf};

use anyhow::Context;
use dandi_docs::{Config, render_readme};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The registry record to document
    #[arg(long, value_name = "PATH", default_value = super::DEFAULT_RECORD)]
    yaml: PathBuf,

    /// Where to write the README
    #[arg(short, long, value_name = "PATH", default_value = "root/README.md")]
    output: PathBuf,

    /// Print the README instead of writing it
    #[arg(long)]
    dry_run: bool,
}

impl Command {
    #[instrument(skip(config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let dataset = super::load_dataset(&self.yaml)?;
        let readme = render_readme(&dataset, config);

        if self.dry_run {
            println!("{readme}");
            return Ok(());
        }

        if let Some(parent) = self.output.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&self.output, readme)
            .with_context(|| format!("failed to write {}", self.output.display()))?;

        println!("{}", format!("Generated {}", self.output.display()).success());
        Ok(())
    }
}
