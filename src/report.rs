//! Per-dataset `DataAtWork` counts across the open-data-registry.

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::instrument;
use walkdir::WalkDir;

use crate::domain::{DataAtWork, Dataset};

mod history;
pub use history::{GitHistory, History, NoHistory};

/// Header of the TSV report.
pub const TSV_HEADER: &str =
    "dataset\tTutorials\tTools & Applications\tPublications\tTotal\tlast_updated";

/// Number of entries in each `DataAtWork` section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    /// Entries under `Tutorials`.
    pub tutorials: usize,
    /// Entries under `Tools & Applications`.
    pub tools: usize,
    /// Entries under `Publications`.
    pub publications: usize,
}

impl Counts {
    /// Entries across all sections.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.tutorials + self.tools + self.publications
    }
}

impl From<&DataAtWork> for Counts {
    fn from(data_at_work: &DataAtWork) -> Self {
        Self {
            tutorials: data_at_work.tutorials.len(),
            tools: data_at_work.tools.len(),
            publications: data_at_work.publications.len(),
        }
    }
}

/// One dataset in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    /// File name of the dataset record.
    pub dataset: String,

    /// The counts, or `None` if the record could not be loaded.
    #[serde(flatten)]
    pub counts: Option<Counts>,

    /// Why the record could not be loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Date of the last change to the record.
    pub last_updated: Option<NaiveDate>,
}

impl Row {
    /// Formats the row as a TSV line, without a trailing newline.
    #[must_use]
    pub fn to_tsv(&self) -> String {
        let last_updated = self
            .last_updated
            .map(|date| date.to_string())
            .unwrap_or_default();

        match &self.counts {
            Some(counts) => format!(
                "{}\t{}\t{}\t{}\t{}\t{last_updated}",
                self.dataset,
                counts.tutorials,
                counts.tools,
                counts.publications,
                counts.total(),
            ),
            None => format!("{}\tERROR\tERROR\tERROR\t0\t{last_updated}", self.dataset),
        }
    }
}

/// `DataAtWork` counts for every dataset in a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
    rows: Vec<Row>,
}

impl Report {
    /// Builds the report for every `*.yaml` record directly inside
    /// `datasets_dir`, in file name order.
    ///
    /// Records that cannot be loaded produce an error row rather than failing
    /// the report.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed.
    #[instrument(level = "debug", skip(history))]
    pub fn build(datasets_dir: &Path, history: &dyn History) -> Result<Self, walkdir::Error> {
        let rows = dataset_files(datasets_dir)?
            .into_iter()
            .map(|path| row_for(&path, history))
            .collect();

        Ok(Self { rows })
    }

    /// The rows, in file name order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Writes the report as TSV, with a header line.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_tsv<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{TSV_HEADER}")?;
        for row in &self.rows {
            writeln!(writer, "{}", row.to_tsv())?;
        }
        Ok(())
    }

    /// Formats the report as a JSON array of rows.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Lists the entries directly inside `dir` whose names end in `.yaml`, sorted
/// by name.
///
/// Hidden entries and directories are included; a directory then shows up in
/// the report as a record that failed to load.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn dataset_files(dir: &Path) -> Result<Vec<PathBuf>, walkdir::Error> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_name().to_string_lossy().ends_with(".yaml") {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn row_for(path: &Path, history: &dyn History) -> Row {
    let dataset = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let last_updated = history.last_updated(path);

    match Dataset::load(path) {
        Ok(record) => Row {
            dataset,
            counts: Some(Counts::from(&record.data_at_work)),
            error: None,
            last_updated,
        },
        Err(error) => {
            tracing::warn!(dataset = %dataset, %error, "failed to load dataset");
            Row {
                dataset,
                counts: None,
                error: Some(error.to_string()),
                last_updated,
            }
        }
    }
}
