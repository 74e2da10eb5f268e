use std::path::PathBuf;

use dandi_docs::{Config, DescriptionParser};
use tracing::instrument;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The registry record whose description is parsed
    #[arg(long, value_name = "PATH", default_value = super::DEFAULT_RECORD)]
    yaml: PathBuf,
}

impl Command {
    #[instrument(skip(config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let dataset = super::load_dataset(&self.yaml)?;
        let parsed = DescriptionParser::new(config.markers.clone()).parse(&dataset.description);

        println!("{}", serde_json::to_string_pretty(&parsed)?);
        Ok(())
    }
}
