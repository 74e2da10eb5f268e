//! DANDI archive documentation generation
//!
//! Documentation and reports are generated from dataset records in the AWS
//! open-data-registry. The free-text description of a record is parsed into
//! structured sections, which are then rendered into a README and an HTML
//! page.

pub mod domain;
pub use domain::{Config, Dataset, DescriptionParser, ParsedDescription};

/// README and HTML rendering.
pub mod render;
pub use render::render_readme;

/// `DataAtWork` reporting across many records.
pub mod report;
pub use report::Report;
