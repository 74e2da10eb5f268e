use std::{io, path::PathBuf};

use dandi_docs::{
    Report,
    report::{GitHistory, History, NoHistory},
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Directory containing the dataset records
    #[arg(
        long,
        value_name = "DIR",
        default_value = "sourcedata/open-data-registry/datasets"
    )]
    datasets: PathBuf,

    /// Root of the registry git checkout, used for last-updated dates
    #[arg(long, value_name = "DIR", default_value = "sourcedata/open-data-registry")]
    repo_root: PathBuf,

    /// Leave the last_updated column empty instead of asking git
    #[arg(long)]
    no_git: bool,

    /// Output format (tsv, json)
    #[arg(long, value_name = "FORMAT", default_value = "tsv")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Tsv,
    Json,
}

impl Command {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        if !self.datasets.is_dir() {
            anyhow::bail!("{} not found", self.datasets.display());
        }

        let report = Report::build(&self.datasets, self.history().as_ref())?;

        match self.format {
            OutputFormat::Tsv => report.write_tsv(&mut io::stdout().lock())?,
            OutputFormat::Json => println!("{}", report.to_json()?),
        }

        let failed = report.rows().iter().filter(|row| row.counts.is_none()).count();
        if failed > 0 {
            eprintln!(
                "{}",
                format!(
                    "{failed} of {} datasets could not be loaded",
                    report.rows().len()
                )
                .warning()
            );
        }

        Ok(())
    }

    fn history(&self) -> Box<dyn History> {
        if self.no_git {
            Box::new(NoHistory)
        } else {
            Box::new(GitHistory::new(&self.repo_root))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{path::Path, process};

    use clap::Parser;

    use super::*;

    /// A git repository with one commit touching `datasets/a.yaml`, or `None`
    /// if git is unavailable.
    fn committed_repo() -> Option<tempfile::TempDir> {
        let repo = tempfile::tempdir().unwrap();
        std::fs::create_dir(repo.path().join("datasets")).unwrap();
        std::fs::write(repo.path().join("datasets/a.yaml"), "Name: A\n").unwrap();

        let git = |args: &[&str]| {
            process::Command::new("git")
                .args(["-c", "user.name=Test", "-c", "user.email=test@example.org"])
                .args(args)
                .current_dir(repo.path())
                .output()
                .is_ok_and(|output| output.status.success())
        };

        (git(&["init", "-q"]) && git(&["add", "."]) && git(&["commit", "-q", "-m", "add"]))
            .then_some(repo)
    }

    fn command(args: &[&str], repo_root: &Path) -> Command {
        let mut argv = vec!["count", "--repo-root", repo_root.to_str().unwrap()];
        argv.extend_from_slice(args);
        Command::try_parse_from(argv).unwrap()
    }

    #[test]
    fn git_dates_by_default() {
        let Some(repo) = committed_repo() else {
            return;
        };
        let file = repo.path().join("datasets/a.yaml");

        let command = command(&[], repo.path());
        assert!(command.history().last_updated(&file).is_some());
    }

    #[test]
    fn no_git_leaves_dates_empty() {
        let Some(repo) = committed_repo() else {
            return;
        };
        let file = repo.path().join("datasets/a.yaml");

        let command = command(&["--no-git"], repo.path());
        assert_eq!(command.history().last_updated(&file), None);
    }

    #[test]
    fn flag_defaults() {
        let command = command(&["--format", "json"], Path::new("registry"));
        assert!(matches!(command.format, OutputFormat::Json));

        let command = Command::try_parse_from(["count"]).unwrap();
        assert!(matches!(command.format, OutputFormat::Tsv));
        assert!(!command.no_git);
    }
}
