//! README generation from a registry record.

use std::sync::LazyLock;

use regex::Regex;
use tracing::instrument;

use super::wrap::{wrap_list_item, wrap_paragraph};
use crate::domain::{
    Config, Dataset, DescriptionParser, ParsedDescription, description::extract_url_from_markdown,
};

/// An uppercase acronym in parentheses, e.g. `(DANDI)`.
static ACRONYM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([A-Z]+)\)").expect("valid regex"));

const DEFAULT_NAME: &str = "DANDI";

const STANDARDS_INTRO: &str = "The data uses a set of community standards:";

const DANDISETS: &str = "We define a DANDI dataset as a Dandiset. A Dandiset is an organized \
                         collection of assets (files) with both file level and dataset level \
                         metadata generated from an experiment or a project.";

const OTHER_PREFIXES: &str = "Other prefixes in the bucket can be ignored. For example:";

const INVENTORY: &str = "- _dandiarchive_ - This folder stores an inventory listing of all items \
                         in the bucket. This is generated automatically by the S3 Inventory \
                         service.";

/// Builds the README for a dataset.
///
/// The output is a sequence of Markdown blocks separated by blank lines, in a
/// fixed order: title, description, Dandisets, web resources, bucket layout,
/// `DataAtWork` listings and keywords.
#[must_use]
#[instrument(level = "debug", skip_all, fields(name = dataset.name.as_deref()))]
pub fn render_readme(dataset: &Dataset, config: &Config) -> String {
    let description =
        DescriptionParser::new(config.markers.clone()).parse(&dataset.description);

    let mut readme = Readme::new(config.wrap_width());

    readme.title(dataset.name.as_deref().unwrap_or(DEFAULT_NAME));
    readme.description(&description);
    readme.dandisets();
    readme.web_resources(dataset, config);
    readme.bucket_organization(&description);
    readme.data_at_work(dataset);
    readme.keywords(dataset, config);

    readme.finish()
}

/// Splits `Name (ACRONYM)` into `("ACRONYM", "Name")`.
#[must_use]
pub fn split_acronym(name: &str) -> Option<(&str, String)> {
    let acronym = ACRONYM.captures(name)?.get(1)?.as_str();
    Some((acronym, name.replace(&format!(" ({acronym})"), "")))
}

struct Readme {
    lines: Vec<String>,
    width: usize,
}

impl Readme {
    const fn new(width: usize) -> Self {
        Self {
            lines: Vec::new(),
            width,
        }
    }

    fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn paragraph(&mut self, text: &str) {
        self.line(wrap_paragraph(text, self.width));
    }

    fn item(&mut self, text: &str) {
        self.line(wrap_list_item(text, self.width));
    }

    fn heading(&mut self, heading: &str) {
        self.line(heading);
        self.blank();
    }

    fn title(&mut self, name: &str) {
        match split_acronym(name) {
            Some((acronym, full_name)) => self.line(format!("# {acronym}: {full_name}")),
            None => self.line(format!("# {name}")),
        }
        self.blank();
    }

    fn description(&mut self, description: &ParsedDescription) {
        if !description.intro.is_empty() {
            self.paragraph(&description.intro_paragraph());
            self.blank();
        }

        if !description.standards.is_empty() {
            self.line(STANDARDS_INTRO);
            for standard in &description.standards {
                self.line(format!("- {standard}"));
            }
            self.blank();
        }

        if !description.acknowledgment.is_empty() {
            self.line(description.acknowledgment.as_str());
            self.blank();
        }
    }

    fn dandisets(&mut self) {
        self.heading("## Dandisets");
        self.paragraph(DANDISETS);
        self.blank();
    }

    fn web_resources(&mut self, dataset: &Dataset, config: &Config) {
        let tools = &dataset.data_at_work;

        self.heading("### Web resources");

        if !dataset.documentation.is_empty() {
            self.line(format!("- Web interface: {}", dataset.documentation));
        }

        if let Some(api) = tools.find_tool(|title| title == config.api_tool_title) {
            self.line(format!("- API: {}", api.url));
        }

        self.line(format!("- Handbook: {}", config.handbook_url));

        if let Some(helpdesk) = extract_url_from_markdown(&dataset.contact) {
            self.line(format!("- Helpdesk: {helpdesk}"));
        }

        self.line(format!("- Github: {}", config.github_url));

        if let Some(bucket) = dataset.resources.iter().find_map(|r| r.s3_bucket()) {
            self.line(format!("- S3 Location: s3://{bucket}/"));
        }

        if let Some(hub) = tools.find_tool(|title| title.contains(&config.hub_tool_marker)) {
            self.item(&format!(
                "- DANDI Hub (a JupyterHub instance): {} (Requires registration via the Web \
                 interface)",
                hub.url
            ));
        }

        self.blank();
    }

    fn bucket_organization(&mut self, description: &ParsedDescription) {
        self.heading("### Organization of the S3 bucket");

        for entry in &description.bucket_org {
            self.item(&format!("- **{}** - {}", entry.key, entry.description));
        }
        self.blank();

        self.heading(OTHER_PREFIXES);
        self.item(INVENTORY);
        self.blank();
    }

    fn data_at_work(&mut self, dataset: &Dataset) {
        let data_at_work = &dataset.data_at_work;

        // tools are always listed, even when there are none
        self.heading("### Tools & Applications");
        self.entries(&data_at_work.tools);
        self.blank();

        for (heading, entries) in [
            ("### Tutorials", &data_at_work.tutorials),
            ("### Publications", &data_at_work.publications),
        ] {
            if entries.is_empty() {
                continue;
            }
            self.heading(heading);
            self.entries(entries);
            self.blank();
        }
    }

    fn entries(&mut self, entries: &[crate::domain::Entry]) {
        for item in entries.iter().filter_map(crate::domain::Entry::to_markdown_item) {
            self.line(item);
        }
    }

    fn keywords(&mut self, dataset: &Dataset, config: &Config) {
        let mut tags: Vec<&str> = dataset
            .tags
            .iter()
            .map(String::as_str)
            .filter(|tag| config.is_keyword(tag))
            .collect();

        if tags.is_empty() {
            return;
        }
        tags.sort_unstable();

        self.heading("#### Keywords:");
        for tag in tags {
            self.line(format!("- {tag}"));
        }
        self.blank();
    }

    fn finish(self) -> String {
        self.lines.join("\n")
    }
}
