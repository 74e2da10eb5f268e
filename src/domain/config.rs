use std::path::Path;

use serde::{Deserialize, Serialize};

use super::description::Markers;

/// Configuration for documentation generation.
///
/// These are the fixed values the generated documents depend on but which are
/// not part of the registry record: line width, links that only exist outside
/// the record, and the phrases that structure the record's description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Target width for wrapped paragraphs and list items.
    wrap_width: usize,

    /// Link to the user handbook.
    pub handbook_url: String,

    /// Link to the GitHub organisation.
    pub github_url: String,

    /// Exact title of the `DataAtWork` tool that is the public API.
    pub api_tool_title: String,

    /// Substring identifying the `DataAtWork` tool that is the `JupyterHub`.
    pub hub_tool_marker: String,

    /// Tags that are never listed as keywords.
    pub excluded_tags: Vec<String>,

    /// `<title>` of the generated HTML page.
    pub page_title: String,

    /// Logo shown at the top of the generated HTML page.
    pub logo_url: String,

    /// Marker phrases used to split the record description into sections.
    pub markers: Markers,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wrap_width: default_wrap_width(),
            handbook_url: default_handbook_url(),
            github_url: default_github_url(),
            api_tool_title: default_api_tool_title(),
            hub_tool_marker: default_hub_tool_marker(),
            excluded_tags: default_excluded_tags(),
            page_title: default_page_title(),
            logo_url: default_logo_url(),
            markers: Markers::default(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the target width for wrapped text.
    #[must_use]
    pub const fn wrap_width(&self) -> usize {
        self.wrap_width
    }

    /// Sets the target width for wrapped text.
    ///
    /// Widths below 20 columns are raised to 20.
    pub fn set_wrap_width(&mut self, width: usize) {
        self.wrap_width = width.max(MIN_WRAP_WIDTH);
    }

    /// Checks whether a tag should be listed as a keyword.
    #[must_use]
    pub fn is_keyword(&self, tag: &str) -> bool {
        !self.excluded_tags.iter().any(|excluded| excluded == tag)
    }
}

const MIN_WRAP_WIDTH: usize = 20;

const fn default_wrap_width() -> usize {
    80
}

fn default_handbook_url() -> String {
    "https://handbook.dandiarchive.org".to_string()
}

fn default_github_url() -> String {
    "https://github.com/dandi".to_string()
}

fn default_api_tool_title() -> String {
    "DANDI API".to_string()
}

fn default_hub_tool_marker() -> String {
    "JupyterHub".to_string()
}

fn default_excluded_tags() -> Vec<String> {
    vec!["aws-pds".to_string()]
}

fn default_page_title() -> String {
    "DANDI Archive".to_string()
}

fn default_logo_url() -> String {
    "https://avatars.githubusercontent.com/u/53260526?s=400&u=9fd82f767e66beeb3959efaf11be707dd4209c96&v=4"
        .to_string()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_wrap_width")]
        wrap_width: usize,

        #[serde(default = "default_handbook_url")]
        handbook_url: String,

        #[serde(default = "default_github_url")]
        github_url: String,

        #[serde(default = "default_api_tool_title")]
        api_tool_title: String,

        #[serde(default = "default_hub_tool_marker")]
        hub_tool_marker: String,

        #[serde(default = "default_excluded_tags")]
        excluded_tags: Vec<String>,

        #[serde(default = "default_page_title")]
        page_title: String,

        #[serde(default = "default_logo_url")]
        logo_url: String,

        #[serde(default)]
        markers: Markers,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                wrap_width,
                handbook_url,
                github_url,
                api_tool_title,
                hub_tool_marker,
                excluded_tags,
                page_title,
                logo_url,
                markers,
            } => Self {
                wrap_width: wrap_width.max(MIN_WRAP_WIDTH),
                handbook_url,
                github_url,
                api_tool_title,
                hub_tool_marker,
                excluded_tags,
                page_title,
                logo_url,
                markers,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            wrap_width: config.wrap_width,
            handbook_url: config.handbook_url,
            github_url: config.github_url,
            api_tool_title: config.api_tool_title,
            hub_tool_marker: config.hub_tool_marker,
            excluded_tags: config.excluded_tags,
            page_title: config.page_title,
            logo_url: config.logo_url,
            markers: config.markers,
        }
    }
}
