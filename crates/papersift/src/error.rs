//! Error types for the papersift library.
//!
//! Every fallible operation in the crate returns [`Result`], whose error side is
//! [`SiftError`]. The variants follow the failure modes of a run:
//! - Network and HTTP failures while talking to E-utilities
//! - Responses that cannot be decoded
//! - Configuration that is unreadable or invalid
//! - Writing the report
//!
//! Parsing an individual PubMed record never produces an error; broken records are
//! skipped (see [`crate::xml::parse_articles`]).
//!
//! # Examples
//!
//! ```
//! use papersift::{config::Config, error::SiftError};
//!
//! let result = Config::from_toml_str("[entrez]\nbatch_size = 0\n");
//! assert!(matches!(result, Err(SiftError::Config(_))));
//! ```

use thiserror::Error;

/// Error type alias used for the [`papersift`](crate) crate.
pub type Result<T> = core::result::Result<T, SiftError>;

/// Errors that can occur while running a query and producing a report.
#[derive(Error, Debug)]
pub enum SiftError {
  /// A network request failed.
  ///
  /// This covers connection failures, TLS errors and timeouts reported by `reqwest`.
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// An E-utilities endpoint answered with a non-success status code.
  #[error("{endpoint} request failed with HTTP status {status}")]
  HttpStatus {
    /// The endpoint that was called (`esearch` or `efetch`).
    endpoint: &'static str,
    /// The status code returned by the server.
    status:   reqwest::StatusCode,
  },

  /// The API accepted the request but reported an error in its payload.
  ///
  /// ESearch does this for malformed queries, returning an `ERROR` field instead of
  /// an identifier list.
  #[error("API error: {0}")]
  ApiError(String),

  /// A JSON response body could not be decoded.
  #[error("Failed to decode response: {0}")]
  Decode(#[from] serde_json::Error),

  /// A configured base URL could not be parsed or joined.
  #[error(transparent)]
  Url(#[from] url::ParseError),

  /// A file system operation failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// Writing the delimited report failed.
  #[error(transparent)]
  Csv(#[from] csv::Error),

  /// A TOML configuration file could not be parsed.
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// A classifier keyword fragment is not a valid regular expression.
  #[error("Invalid keyword pattern `{pattern}`: {source}")]
  InvalidPattern {
    /// The offending fragment as written in the configuration.
    pattern: String,
    /// The underlying regex compilation error.
    source:  regex::Error,
  },

  /// A configuration value is out of range or otherwise unusable.
  #[error("{0}")]
  Config(String),
}
