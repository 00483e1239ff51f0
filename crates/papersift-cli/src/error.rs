//! Error types for the `get-papers-list` binary.

use papersift::error::SiftError;
use thiserror::Error;

/// Error type alias used throughout the CLI.
pub type Result<T> = core::result::Result<T, CliError>;

/// Everything that can end a run early.
#[derive(Error, Debug)]
pub enum CliError {
  /// Searching, fetching, configuring or writing the report failed.
  #[error(transparent)]
  Sift(#[from] SiftError),

  /// Writing to the terminal failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// The progress bar template was rejected.
  #[error("Invalid progress template: {0}")]
  Template(#[from] indicatif::style::TemplateError),
}
