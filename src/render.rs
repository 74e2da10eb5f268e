//! Rendering of registry records into documentation.

/// HTML page generation.
pub mod html;
pub use html::{Auto, Builtin, ConvertError, MarkdownConverter, Pandoc};

mod readme;
pub use readme::{render_readme, split_acronym};

/// Text wrapping helpers.
pub mod wrap;
