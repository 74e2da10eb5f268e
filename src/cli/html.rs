use std::{fs, io, path::PathBuf};

use anyhow::Context;
use dandi_docs::{
    Config,
    render::{Auto, Builtin, MarkdownConverter, Pandoc, html::markdown_to_page},
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The README to convert
    #[arg(long, value_name = "PATH", default_value = "root/README.md")]
    readme: PathBuf,

    /// Where to write the HTML page
    #[arg(short, long, value_name = "PATH", default_value = "root/index.html")]
    output: PathBuf,

    /// How to convert Markdown to HTML
    #[arg(long, value_name = "CONVERTER", default_value = "auto")]
    converter: Converter,

    /// Print the page instead of writing it
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum Converter {
    /// pandoc if it is installed, otherwise builtin
    #[default]
    Auto,
    /// The external pandoc executable
    Pandoc,
    /// The in-process CommonMark converter
    Builtin,
}

impl Converter {
    fn build(self) -> Box<dyn MarkdownConverter> {
        match self {
            Self::Auto => Box::new(Auto::default()),
            Self::Pandoc => Box::new(Pandoc::default()),
            Self::Builtin => Box::new(Builtin),
        }
    }
}

impl Command {
    #[instrument(skip(config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let markdown = match fs::read_to_string(&self.readme) {
            Ok(markdown) => markdown,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                anyhow::bail!("{} not found", self.readme.display())
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", self.readme.display()));
            }
        };

        let page = markdown_to_page(&markdown, self.converter.build().as_ref(), config)?;

        if self.dry_run {
            print!("{page}");
            return Ok(());
        }

        if let Some(parent) = self.output.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&self.output, page)
            .with_context(|| format!("failed to write {}", self.output.display()))?;

        println!("{}", format!("Generated {}", self.output.display()).success());
        Ok(())
    }
}
