//! Parsing of the free-text `Description` field of a registry record.
//!
//! The description is semi-structured Markdown: an introductory paragraph,
//! a list of community standards, a list describing the layout of the S3
//! bucket and a closing acknowledgment. Sections are introduced by fixed
//! marker phrases. Parsing is a single top-to-bottom scan over the lines and
//! never fails; lines that don't fit the expected shape are dropped.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// `[text](url)` anywhere in a line.
static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid regex"));

/// `[Name](url)` at the start of a standards list item.
static STANDARD_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\]]+)\]\(([^)]+)\)").expect("valid regex"));

/// `- **KEY** - DESCRIPTION` bucket organization list item.
static BUCKET_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^- \*\*([^*]+)\*\*\s*-\s*(.+)").expect("valid regex"));

/// The phrases that separate the sections of a description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markers {
    /// A line containing this phrase starts the standards list.
    pub standards: String,

    /// A line containing this phrase starts the bucket organization list.
    pub bucket_org: String,

    /// A line starting with this prefix is the acknowledgment. Nothing after
    /// it is classified.
    pub acknowledgment: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            standards: "Data is organized using community standards:".to_string(),
            bucket_org: "The S3 bucket is organized as follows:".to_string(),
            acknowledgment: "Development of DANDI".to_string(),
        }
    }
}

/// The structured sections extracted from a description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedDescription {
    /// Non-blank lines preceding the first marker, in order.
    pub intro: Vec<String>,

    /// Standards as `Name: description` strings.
    pub standards: Vec<String>,

    /// Bucket prefixes and their descriptions, in order.
    pub bucket_org: Vec<BucketEntry>,

    /// The acknowledgment line, or an empty string if there is none.
    pub acknowledgment: String,
}

impl ParsedDescription {
    /// The intro lines joined into a single paragraph.
    #[must_use]
    pub fn intro_paragraph(&self) -> String {
        self.intro.join(" ")
    }
}

/// A single `- **key** - description` item of the bucket organization list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketEntry {
    /// The prefix, without a trailing `/`.
    pub key: String,

    /// Free-text description, with Markdown links reduced to their text.
    pub description: String,
}

impl BucketEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
        }
    }
}

/// The section the scan is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Intro,
    Standards,
    BucketOrg,
    Done,
}

/// Splits a description into its sections.
#[derive(Debug, Clone, Default)]
pub struct DescriptionParser {
    markers: Markers,
}

impl DescriptionParser {
    /// Creates a parser recognising the given marker phrases.
    #[must_use]
    pub const fn new(markers: Markers) -> Self {
        Self { markers }
    }

    /// Parses a description into its sections.
    #[must_use]
    pub fn parse(&self, description: &str) -> ParsedDescription {
        let mut result = ParsedDescription::default();
        let mut section = Section::Intro;

        for line in description.trim().lines() {
            if section == Section::Done {
                break;
            }
            let line = line.trim();

            if line.contains(&self.markers.standards) {
                section = Section::Standards;
                continue;
            }
            if line.contains(&self.markers.bucket_org) {
                section = Section::BucketOrg;
                continue;
            }
            if line.starts_with(&self.markers.acknowledgment) {
                line.clone_into(&mut result.acknowledgment);
                section = Section::Done;
                continue;
            }

            match section {
                Section::Intro => push_intro(&mut result, line),
                Section::Standards => push_standard(&mut result, line),
                Section::BucketOrg => push_bucket_line(&mut result, line),
                Section::Done => {}
            }
        }

        tracing::trace!(
            intro = result.intro.len(),
            standards = result.standards.len(),
            bucket_org = result.bucket_org.len(),
            "parsed description"
        );

        result
    }
}

/// Parses a description using the default DANDI marker phrases.
#[must_use]
pub fn parse(description: &str) -> ParsedDescription {
    DescriptionParser::default().parse(description)
}

fn push_intro(result: &mut ParsedDescription, line: &str) {
    if !line.is_empty() {
        result.intro.push(line.to_string());
    }
}

fn push_standard(result: &mut ParsedDescription, line: &str) {
    if let Some(name) = match_standard(line) {
        result.standards.push(name);
    }
}

fn push_bucket_line(result: &mut ParsedDescription, line: &str) {
    if let Some(entry) = match_bucket_entry(line) {
        result.bucket_org.push(entry);
        return;
    }

    if line.is_empty() || line.starts_with('-') {
        return;
    }

    // continuation of the previous item, if there is one
    if let Some(last) = result.bucket_org.last_mut() {
        last.description.push(' ');
        last.description.push_str(&strip_markdown_links(line));
    }
}

/// Matches a standards list item such as `- [NWB](https://nwb.org) and`.
///
/// The list marker, trailing commas and a trailing `and` are ignored. Returns
/// the link text with ` - ` rewritten to `: `, so `[NWB - Neurodata Without
/// Borders](...)` becomes `NWB: Neurodata Without Borders`.
#[must_use]
pub fn match_standard(line: &str) -> Option<String> {
    let item = line
        .trim_start_matches(['-', ' '])
        .trim_end_matches(',')
        .trim_end();
    let item = item.strip_suffix(" and").unwrap_or(item).trim_end_matches(',');

    STANDARD_LINK
        .captures(item)
        .map(|captures| captures[1].replace(" - ", ": "))
}

/// Matches a bucket organization list item such as
/// `- **raw/** - Raw files.`.
#[must_use]
pub fn match_bucket_entry(line: &str) -> Option<BucketEntry> {
    BUCKET_ENTRY.captures(line).map(|captures| {
        BucketEntry::new(
            captures[1].trim_end_matches('/'),
            strip_markdown_links(&captures[2]),
        )
    })
}

/// Replaces every `[text](url)` with `text`.
#[must_use]
pub fn strip_markdown_links(text: &str) -> String {
    MARKDOWN_LINK.replace_all(text, "${1}").into_owned()
}

/// Returns the URL of the first `[text](url)` link in `text`.
#[must_use]
pub fn extract_url_from_markdown(text: &str) -> Option<&str> {
    MARKDOWN_LINK
        .captures(text)
        .and_then(|captures| captures.get(2))
        .map(|url| url.as_str())
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    const FULL: &str = "\
The DANDI archive hosts neurophysiology data.
It supports many modalities.

Data is organized using community standards:
- [NWB - Neurodata Without Borders](https://nwb.org),
- [BIDS - Brain Imaging Data Structure](https://bids.neuroimaging.io) and
- [OME-Zarr](https://ngff.openmicroscopy.org)

The S3 bucket is organized as follows:
- **dandisets/** - Metadata for each [Dandiset](https://dandiarchive.org).
- **blobs/** - Files, addressed by
  [content hash](https://example.org/hash).
- **zarr/** - Zarr archives.

Development of DANDI is supported by the NIH.
- **ignored/** - Never parsed.
";

    #[test]
    fn full_description() {
        let parsed = parse(FULL);

        assert_eq!(
            parsed.intro,
            [
                "The DANDI archive hosts neurophysiology data.",
                "It supports many modalities."
            ]
        );
        assert_eq!(
            parsed.standards,
            [
                "NWB: Neurodata Without Borders",
                "BIDS: Brain Imaging Data Structure",
                "OME-Zarr"
            ]
        );
        assert_eq!(
            parsed.bucket_org,
            [
                BucketEntry::new("dandisets", "Metadata for each Dandiset."),
                BucketEntry::new("blobs", "Files, addressed by content hash."),
                BucketEntry::new("zarr", "Zarr archives."),
            ]
        );
        assert_eq!(
            parsed.acknowledgment,
            "Development of DANDI is supported by the NIH."
        );
    }

    #[test]
    fn intro_and_standards() {
        let parsed = parse(
            "Hello.\nData is organized using community standards:\n- [NWB](https://nwb.org) and\n- [BIDS](https://bids.org)\n",
        );

        assert_eq!(parsed.intro, ["Hello."]);
        assert_eq!(parsed.standards, ["NWB", "BIDS"]);
        assert!(parsed.bucket_org.is_empty());
        assert!(parsed.acknowledgment.is_empty());
    }

    #[test]
    fn bucket_entries_with_continuation() {
        let parsed = parse(
            "The S3 bucket is organized as follows:\n- **raw/** - Raw files.\n  More detail.\n- **derived/** - Derived files.\n",
        );

        assert!(parsed.intro.is_empty());
        assert_eq!(
            parsed.bucket_org,
            [
                BucketEntry::new("raw", "Raw files. More detail."),
                BucketEntry::new("derived", "Derived files."),
            ]
        );
    }

    #[test]
    fn leading_continuation_is_dropped() {
        let parsed = parse(
            "The S3 bucket is organized as follows:\norphan text\n- **raw/** - Raw files.\n",
        );

        assert_eq!(parsed.bucket_org, [BucketEntry::new("raw", "Raw files.")]);
    }

    #[test]
    fn unrecognised_list_item_is_not_a_continuation() {
        let parsed = parse(
            "The S3 bucket is organized as follows:\n- **raw/** - Raw files.\n- plain item\n",
        );

        assert_eq!(parsed.bucket_org, [BucketEntry::new("raw", "Raw files.")]);
    }

    #[test]
    fn standards_ignore_non_links() {
        let parsed = parse(
            "Data is organized using community standards:\n- [NWB](https://nwb.org)\nsome prose\n- not a link\n",
        );

        assert_eq!(parsed.standards, ["NWB"]);
        assert!(parsed.intro.is_empty());
    }

    #[test]
    fn acknowledgment_stops_classification() {
        let parsed = parse(
            "Intro.\nDevelopment of DANDI is funded.\nMore intro.\nData is organized using community standards:\n- [NWB](https://nwb.org)\n",
        );

        assert_eq!(parsed.intro, ["Intro."]);
        assert_eq!(parsed.acknowledgment, "Development of DANDI is funded.");
        assert!(parsed.standards.is_empty());
        assert!(parsed.bucket_org.is_empty());
    }

    #[test]
    fn markers_are_matched_as_substrings() {
        let parsed = parse(
            "Intro.\nNote: Data is organized using community standards: see below\n- [NWB](https://nwb.org)\n",
        );

        assert_eq!(parsed.intro, ["Intro."]);
        assert_eq!(parsed.standards, ["NWB"]);
    }

    #[test]
    fn markers_are_case_sensitive() {
        let parsed = parse("data is organized using community standards:\n- [NWB](https://nwb.org)\n");

        assert!(parsed.standards.is_empty());
        assert_eq!(parsed.intro.len(), 2);
    }

    #[test]
    fn no_markers_means_everything_is_intro() {
        let parsed = parse("  first line  \n\n\tsecond line\n\n- [NWB](https://nwb.org)\n");

        assert_eq!(
            parsed.intro,
            ["first line", "second line", "- [NWB](https://nwb.org)"]
        );
        assert!(parsed.standards.is_empty());
        assert!(parsed.bucket_org.is_empty());
        assert!(parsed.acknowledgment.is_empty());
    }

    #[test_case(""; "empty")]
    #[test_case("   \n\n  "; "whitespace only")]
    fn blank_input_yields_empty_record(input: &str) {
        assert_eq!(parse(input), ParsedDescription::default());
    }

    #[test]
    fn parsing_is_deterministic() {
        assert_eq!(parse(FULL), parse(FULL));
    }

    #[test]
    fn custom_markers() {
        let parser = DescriptionParser::new(Markers {
            standards: "Standards:".to_string(),
            bucket_org: "Layout:".to_string(),
            acknowledgment: "Thanks".to_string(),
        });

        let parsed = parser.parse(
            "About.\nStandards:\n- [NWB](https://nwb.org)\nLayout:\n- **a/** - A.\nThanks to all.\n",
        );

        assert_eq!(parsed.intro, ["About."]);
        assert_eq!(parsed.standards, ["NWB"]);
        assert_eq!(parsed.bucket_org, [BucketEntry::new("a", "A.")]);
        assert_eq!(parsed.acknowledgment, "Thanks to all.");
    }

    #[test]
    fn intro_paragraph_joins_lines() {
        let parsed = parse("One.\nTwo.\n\nThree.");
        assert_eq!(parsed.intro_paragraph(), "One. Two. Three.");
    }

    #[test_case("- [NWB](https://nwb.org)", Some("NWB"); "list item")]
    #[test_case("[NWB](https://nwb.org),", Some("NWB"); "trailing comma")]
    #[test_case("- [NWB](https://nwb.org) and", Some("NWB"); "trailing and")]
    #[test_case("- [A - B - C](https://x.org)", Some("A: B: C"); "every separator")]
    #[test_case("- see [NWB](https://nwb.org)", None; "link not at start")]
    #[test_case("- NWB", None; "no link")]
    fn standard_item(line: &str, expected: Option<&str>) {
        assert_eq!(match_standard(line).as_deref(), expected);
    }

    #[test_case("- **raw/** - Raw files.", Some(("raw", "Raw files.")); "trailing slash")]
    #[test_case("- **raw** -Raw files.", Some(("raw", "Raw files.")); "no slash or space")]
    #[test_case("- **a/b//** - [x](https://x.org) y", Some(("a/b", "x y")); "nested key with link")]
    #[test_case("- **raw/**", None; "missing description")]
    #[test_case("**raw/** - Raw files.", None; "missing list marker")]
    fn bucket_item(line: &str, expected: Option<(&str, &str)>) {
        let expected = expected.map(|(key, description)| BucketEntry::new(key, description));
        assert_eq!(match_bucket_entry(line), expected);
    }

    #[test_case("see [docs](https://a.org) and [api](https://b.org)", "see docs and api"; "two links")]
    #[test_case("no links here", "no links here"; "plain")]
    #[test_case("[](https://a.org) [x]()", "[](https://a.org) [x]()"; "empty parts untouched")]
    fn strip_links(input: &str, expected: &str) {
        assert_eq!(strip_markdown_links(input), expected);
    }

    #[test]
    fn strip_links_is_idempotent() {
        let once = strip_markdown_links(FULL);
        assert_eq!(strip_markdown_links(&once), once);
    }

    #[test_case("[Helpdesk](https://help.example.org)", Some("https://help.example.org"); "link")]
    #[test_case("mail [a](https://a.org) or [b](https://b.org)", Some("https://a.org"); "first link")]
    #[test_case("help@example.org", None; "no link")]
    fn extract_url(input: &str, expected: Option<&str>) {
        assert_eq!(extract_url_from_markdown(input), expected);
    }
}
