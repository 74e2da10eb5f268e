use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::Path,
};

use serde::{Deserialize, Deserializer};

/// A dataset record from the open-data-registry.
///
/// Only the fields used for documentation and reporting are modelled. Every
/// field is optional and unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Dataset {
    /// Full name, e.g. `Distributed Archives for Neurophysiology Data
    /// Integration (DANDI)`.
    #[serde(rename = "Name")]
    pub name: Option<String>,

    /// Semi-structured Markdown description.
    #[serde(rename = "Description", deserialize_with = "null_as_default")]
    pub description: String,

    /// URL of the documentation or web interface.
    #[serde(rename = "Documentation", deserialize_with = "null_as_default")]
    pub documentation: String,

    /// Contact information, usually a Markdown link.
    #[serde(rename = "Contact", deserialize_with = "null_as_default")]
    pub contact: String,

    /// Free-form keywords.
    #[serde(rename = "Tags", deserialize_with = "null_as_default")]
    pub tags: Vec<String>,

    /// Storage resources backing the dataset.
    #[serde(rename = "Resources", deserialize_with = "null_as_default")]
    pub resources: Vec<Resource>,

    /// Tutorials, tools and publications built on the dataset.
    #[serde(rename = "DataAtWork", deserialize_with = "null_as_default")]
    pub data_at_work: DataAtWork,
}

/// A resource (bucket, topic, ...) backing a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Resource {
    /// Amazon resource name, e.g. `arn:aws:s3:::dandiarchive`.
    #[serde(rename = "ARN", deserialize_with = "null_as_default")]
    pub arn: String,
}

impl Resource {
    /// The bucket name, if this resource is an S3 bucket.
    #[must_use]
    pub fn s3_bucket(&self) -> Option<&str> {
        self.arn.strip_prefix("arn:aws:s3:::")
    }
}

/// The `DataAtWork` block of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DataAtWork {
    /// Tutorials using the dataset.
    #[serde(rename = "Tutorials", deserialize_with = "null_as_default")]
    pub tutorials: Vec<Entry>,

    /// Tools and applications built on the dataset.
    #[serde(rename = "Tools & Applications", deserialize_with = "null_as_default")]
    pub tools: Vec<Entry>,

    /// Publications using the dataset.
    #[serde(rename = "Publications", deserialize_with = "null_as_default")]
    pub publications: Vec<Entry>,
}

impl DataAtWork {
    /// The first tool whose title satisfies `predicate`.
    #[must_use]
    pub fn find_tool(&self, predicate: impl Fn(&str) -> bool) -> Option<&Entry> {
        self.tools.iter().find(|tool| predicate(&tool.title))
    }
}

/// A tutorial, tool or publication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Entry {
    /// Display title.
    #[serde(rename = "Title", deserialize_with = "null_as_default")]
    pub title: String,

    /// Link to the entry.
    #[serde(rename = "URL", deserialize_with = "null_as_default")]
    pub url: String,

    /// Author or maintaining team.
    #[serde(rename = "AuthorName", deserialize_with = "null_as_default")]
    pub author_name: String,
}

impl Entry {
    /// Renders the entry as `- [Title](URL) - AuthorName`.
    ///
    /// Returns `None` if the title or URL is missing.
    #[must_use]
    pub fn to_markdown_item(&self) -> Option<String> {
        if self.title.is_empty() || self.url.is_empty() {
            return None;
        }
        Some(format!(
            "- [{}]({}) - {}",
            self.title, self.url, self.author_name
        ))
    }
}

/// YAML allows `Key:` with no value, which deserializes as null.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Dataset {
    /// Parses a record from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid YAML or does not have the
    /// shape of a registry record. An empty document is an error.
    pub fn from_yaml(yaml: &str) -> Result<Self, LoadError> {
        if yaml.trim().is_empty() {
            return Err(LoadError::Empty);
        }
        let dataset: Option<Self> = serde_yaml::from_str(yaml)?;
        dataset.ok_or(LoadError::Empty)
    }

    /// Loads a record from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::NotFound`] if the file does not exist, or another
    /// variant if it cannot be read or parsed.
    #[tracing::instrument(level = "debug")]
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|io_error| match io_error.kind() {
            io::ErrorKind::NotFound => LoadError::NotFound,
            _ => LoadError::Io(io_error),
        })?;

        let mut yaml = String::new();
        BufReader::new(file).read_to_string(&mut yaml)?;
        Self::from_yaml(&yaml)
    }
}

/// Errors that can occur when loading a dataset record.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The record file was not found.
    #[error("file not found")]
    NotFound,

    /// The record file is empty.
    #[error("empty document")]
    Empty,

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The YAML could not be parsed.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}
