//! Find PubMed papers with at least one pharmaceutical or biotech affiliated author.
//!
//! `papersift` runs a PubMed query through the NCBI E-utilities, downloads the matching
//! records, and keeps the articles where at least one author lists a company affiliation.
//! The surviving articles are flattened into report rows that can be written as CSV (or any
//! other single-byte delimited format).
//!
//! # Pipeline
//!
//! The work happens in a fixed, sequential order:
//!
//! 1. [`entrez::EntrezClient::search`] resolves the query into PubMed identifiers (ESearch).
//! 2. [`pipeline::Pipeline`] splits the identifiers into batches and fetches the full records for
//!    each batch, one request at a time (EFetch).
//! 3. [`xml::parse_articles`] turns each XML payload into [`article::Article`] values.
//! 4. [`classifier::Classifier`] decides, per affiliation, whether it belongs to a company.
//! 5. [`report::RowBuilder`] keeps qualifying articles and [`report::ReportWriter`] renders them.
//!
//! # Getting Started
//!
//! ```no_run
//! use papersift::{
//!   classifier::Classifier, config::Config, entrez::EntrezClient, pipeline::Pipeline,
//!   report::ReportWriter,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let config = Config::default();
//!   let client = EntrezClient::new(config.entrez.clone())?;
//!   let classifier = Classifier::from_config(&config.classifier)?;
//!
//!   let report = Pipeline::new(client, classifier)
//!     .with_batch_size(config.entrez.batch_size)
//!     .run("CRISPR AND gene editing", 100)
//!     .await?;
//!
//!   ReportWriter::from_config(&config.report)?.write(&report.rows, std::io::stdout())?;
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`config`]: TOML configuration, including the classifier keyword lists
//! - [`entrez`]: ESearch/EFetch client and the [`entrez::LiteratureSource`] seam
//! - [`xml`]: PubMed XML record parsing
//! - [`article`]: Parsed article, author and date types
//! - [`classifier`]: Company versus academic affiliation rules
//! - [`report`]: Output rows and the delimited writer
//! - [`pipeline`]: Glue that drives one query from search to rows
//! - [`format`]: Small text helpers shared by the report
//! - [`prelude`]: Common traits and types for ergonomic imports

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  fmt::Display,
  path::{Path, PathBuf},
  str::FromStr,
  time::Duration,
};

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod article;
pub mod classifier;
pub mod config;
pub mod entrez;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod report;
pub mod xml;

use crate::{article::*, classifier::*, config::*, entrez::*, error::*, report::*};

/// Common traits and types for ergonomic imports.
///
/// ```no_run
/// use papersift::prelude::*;
///
/// async fn count(source: &impl LiteratureSource) -> Result<usize, SiftError> {
///   Ok(source.search("aspirin", 10).await?.len())
/// }
/// ```
pub mod prelude {
  pub use crate::{entrez::LiteratureSource, error::SiftError};
}
