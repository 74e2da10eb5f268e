//! Domain models for DANDI documentation generation.
//!
//! This module contains the registry record types, the parser for the
//! semi-structured record description, and configuration.

mod config;
pub use config::Config;

/// Registry dataset records and their loader.
pub mod dataset;
pub use dataset::{DataAtWork, Dataset, Entry, LoadError};

/// Splitting a record description into structured sections.
pub mod description;
pub use description::{BucketEntry, DescriptionParser, Markers, ParsedDescription};
