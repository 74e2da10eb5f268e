//! HTML page generation from the README.
//!
//! Markdown is converted to an HTML fragment by a [`MarkdownConverter`] and
//! then placed into a fixed page template. Pandoc is preferred when it is
//! installed since it produces the same output as the published page; the
//! built-in converter is a CommonMark fallback.

use std::{
    io::{self, Write},
    path::PathBuf,
    process::{Command, ExitStatus, Stdio},
    sync::LazyLock,
};

use regex::Regex;
use tracing::instrument;

use crate::domain::Config;

/// Pandoc input format. Bare URLs become links.
const PANDOC_FORMAT: &str = "markdown+autolink_bare_uris";

/// A bare `http(s)://` URL preceded by whitespace or the start of the text.
///
/// Trailing punctuation is left outside the link. This approximates pandoc's
/// `autolink_bare_uris` only loosely: a URL directly after `(` is not linked,
/// and URLs inside code spans are rewritten too.
static BARE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(^|\s)(https?://[^\s<>()\[\]]*[^\s<>()\[\].,;:!?'"])"#).expect("valid regex")
});

const CSS: &str = r#"body {
    color: black;
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto,
                 "Helvetica Neue", Arial, sans-serif;
    line-height: 1.6;
    max-width: 900px;
    margin: 0 auto;
    padding: 20px;
}
a {
    color: #0366d6;
}
h1, h2, h3, h4 {
    margin-top: 1.5em;
    margin-bottom: 0.5em;
}
ul {
    padding-left: 2em;
}
code {
    background-color: #f6f8fa;
    padding: 0.2em 0.4em;
    border-radius: 3px;
}
"#;

/// Converts Markdown to an HTML fragment.
pub trait MarkdownConverter {
    /// Converts `markdown` to HTML.
    ///
    /// # Errors
    ///
    /// Returns an error if the conversion cannot be performed.
    fn to_html(&self, markdown: &str) -> Result<String, ConvertError>;
}

/// Converts Markdown by running `pandoc`.
#[derive(Debug, Clone)]
pub struct Pandoc {
    program: PathBuf,
}

impl Default for Pandoc {
    fn default() -> Self {
        Self::new("pandoc")
    }
}

impl Pandoc {
    /// Uses the given pandoc executable.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl MarkdownConverter for Pandoc {
    #[instrument(level = "debug", skip(markdown))]
    fn to_html(&self, markdown: &str) -> Result<String, ConvertError> {
        let mut child = Command::new(&self.program)
            .args(["-f", PANDOC_FORMAT, "-t", "html"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|error| match error.kind() {
                io::ErrorKind::NotFound => ConvertError::NotInstalled,
                _ => ConvertError::Io(error),
            })?;

        // pandoc reads all of its input before writing any output
        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(markdown.as_bytes()) {
                Ok(()) => {}
                // the exit status tells us what went wrong
                Err(error) if error.kind() == io::ErrorKind::BrokenPipe => {}
                Err(error) => return Err(error.into()),
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(ConvertError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Converts Markdown in-process using `CommonMark` rules.
///
/// Bare URLs are turned into links first, matching pandoc's
/// `autolink_bare_uris` extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct Builtin;

impl MarkdownConverter for Builtin {
    fn to_html(&self, markdown: &str) -> Result<String, ConvertError> {
        let markdown = autolink_bare_urls(markdown);
        let parser = pulldown_cmark::Parser::new(&markdown);

        let mut html = String::new();
        pulldown_cmark::html::push_html(&mut html, parser);
        Ok(html)
    }
}

/// Uses pandoc when it is installed, and the built-in converter otherwise.
#[derive(Debug, Clone, Default)]
pub struct Auto {
    pandoc: Pandoc,
}

impl Auto {
    /// Prefers the given pandoc executable.
    #[must_use]
    pub const fn new(pandoc: Pandoc) -> Self {
        Self { pandoc }
    }
}

impl MarkdownConverter for Auto {
    fn to_html(&self, markdown: &str) -> Result<String, ConvertError> {
        match self.pandoc.to_html(markdown) {
            Err(ConvertError::NotInstalled) => {
                tracing::info!("pandoc not found, using the built-in converter");
                Builtin.to_html(markdown)
            }
            result => result,
        }
    }
}

/// Wraps bare `http(s)://` URLs in angle brackets so `CommonMark` links them.
///
/// URLs that are already the target of a Markdown link or inside angle
/// brackets are left alone, as is a URL directly after `(`. Code spans are
/// not recognised.
#[must_use]
pub fn autolink_bare_urls(markdown: &str) -> String {
    BARE_URL.replace_all(markdown, "${1}<${2}>").into_owned()
}

/// Places an HTML fragment into the page template.
#[must_use]
pub fn render_page(body: &str, config: &Config) -> String {
    format!(
        "<html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n\
         <style>\n\
         {CSS}\n\
         </style>\n\
         </head>\n\
         <body>\n\
         <p><img src=\"{logo}\" width=\"200px\" alt=\"DANDI Logo\"></p>\n\
         {body}\n\
         </body>\n\
         </html>\n",
        title = config.page_title,
        logo = config.logo_url,
    )
}

/// Converts a Markdown document into a complete HTML page.
///
/// # Errors
///
/// Returns an error if the Markdown cannot be converted.
pub fn markdown_to_page(
    markdown: &str,
    converter: &dyn MarkdownConverter,
    config: &Config,
) -> Result<String, ConvertError> {
    let body = converter.to_html(markdown)?;
    Ok(render_page(&body, config))
}

/// Errors that can occur when converting Markdown to HTML.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The converter executable could not be found.
    #[error("pandoc not found; install it from https://pandoc.org/installing.html")]
    NotInstalled,

    /// Communicating with the converter failed.
    #[error("failed to run converter: {0}")]
    Io(#[from] io::Error),

    /// The converter exited unsuccessfully.
    #[error("converter failed ({status}): {stderr}")]
    Failed {
        /// Exit status of the converter.
        status: ExitStatus,
        /// Captured standard error.
        stderr: String,
    },
}
