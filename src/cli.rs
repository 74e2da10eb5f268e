use std::path::{Path, PathBuf};

mod count;
mod html;
mod parse;
mod readme;
mod terminal;

use anyhow::Context;
use clap::ArgAction;
use dandi_docs::{Config, Dataset, domain::LoadError};

/// Config file picked up from the working directory when `--config` is not
/// given.
const DEFAULT_CONFIG: &str = "dandi-docs.toml";

/// The DANDI record inside an open-data-registry checkout.
const DEFAULT_RECORD: &str = "sourcedata/open-data-registry/datasets/dandiarchive.yaml";

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = load_config(self.config.as_deref())?;
        self.command.run(&config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        // stdout carries generated documents
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Generate the README from a registry record
    Readme(readme::Command),

    /// Generate the HTML page from the README
    Html(html::Command),

    /// Count DataAtWork entries for every dataset in the registry
    ///
    /// Prints one row per dataset with the number of tutorials, tools and
    /// publications, and the date the record was last changed in git.
    Count(count::Command),

    /// Show the structured sections of a record's description
    Parse(parse::Command),
}

impl Command {
    fn run(self, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::Readme(command) => command.run(config)?,
            Self::Html(command) => command.run(config)?,
            Self::Count(command) => command.run()?,
            Self::Parse(command) => command.run(config)?,
        }
        Ok(())
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match path {
        Some(path) => path,
        None if Path::new(DEFAULT_CONFIG).exists() => Path::new(DEFAULT_CONFIG),
        None => return Ok(Config::default()),
    };

    tracing::debug!(path = %path.display(), "loading configuration");
    Config::load(path).map_err(|e| anyhow::anyhow!("{e}"))
}

/// Loads a registry record, reporting a missing file by name.
fn load_dataset(path: &Path) -> anyhow::Result<Dataset> {
    match Dataset::load(path) {
        Ok(dataset) => Ok(dataset),
        Err(LoadError::NotFound) => anyhow::bail!("{} not found", path.display()),
        Err(e) => Err(e).with_context(|| format!("failed to load {}", path.display())),
    }
}
