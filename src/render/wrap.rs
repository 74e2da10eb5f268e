//! Line wrapping for generated Markdown.

use textwrap::{Options, WordSeparator};

/// Words are only separated at spaces so URLs are never split.
fn base_options(width: usize) -> Options<'static> {
    Options::new(width).word_separator(WordSeparator::AsciiSpace)
}

/// Wraps a paragraph to `width` columns.
#[must_use]
pub fn wrap_paragraph(text: &str, width: usize) -> String {
    textwrap::fill(text, base_options(width))
}

/// Wraps a `- ` list item, indenting continuation lines by two spaces so they
/// stay inside the item.
///
/// The item text is wrapped to `width` before the `- ` marker is added, so the
/// first line may run two columns past `width`.
///
/// Text that isn't a `- ` list item is returned unchanged.
#[must_use]
pub fn wrap_list_item(text: &str, width: usize) -> String {
    let Some(content) = text.strip_prefix("- ") else {
        return text.to_string();
    };

    let options = base_options(width).subsequent_indent("  ");

    format!("- {}", textwrap::fill(content, options))
}
