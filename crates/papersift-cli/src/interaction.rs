//! Console output for the CLI.
//!
//! Status lines are styled with [`console`]. The report itself goes to stdout untouched, so
//! status lines that are not part of the result go to stderr.

use std::{fmt::Display, io::Write};

use console::style;

use super::*;

/// Prefix for information messages
pub static INFO_PREFIX: &str = "ℹ ";
/// Prefix for success messages
pub static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for warning messages
pub static WARNING_PREFIX: &str = "⚠ ";
/// Prefix for error messages
pub static ERROR_PREFIX: &str = "✗ ";

/// Joins a styled prefix and a message. Every prefix already ends with a space.
fn status_line(prefix: impl Display, message: impl Display) -> String {
  format!("{prefix}{message}")
}

/// Something to tell the user.
#[derive(Debug)]
pub enum ResponseContent<'a> {
  /// Progress information, written to stderr
  Info(&'a str),
  /// The run produced its result, written to stdout
  Success(&'a str),
  /// The run finished without a result, written to stdout
  Warning(&'a str),
  /// The run failed, written to stderr
  Error(&'a CliError),
  /// The rendered report, written to stdout as is
  Report(&'a str),
}

/// How the CLI talks back to the user.
pub trait UserInteraction {
  /// Shows one piece of content.
  fn reply(&self, content: ResponseContent) -> Result<()>;
}

/// Interaction over the process's stdout and stderr.
#[derive(Debug, Default)]
pub struct Terminal;

impl UserInteraction for Terminal {
  fn reply(&self, content: ResponseContent) -> Result<()> {
    match content {
      ResponseContent::Info(message) => {
        eprintln!("{}", status_line(style(INFO_PREFIX).blue(), message));
      },
      ResponseContent::Success(message) => {
        println!("{}", status_line(style(SUCCESS_PREFIX).green(), message));
      },
      ResponseContent::Warning(message) => {
        println!("{}", status_line(style(WARNING_PREFIX).yellow(), message));
      },
      ResponseContent::Error(error) => {
        eprintln!(
          "{}",
          status_line(style(ERROR_PREFIX).red(), format_args!("Error: {}", style(error).red()))
        );
      },
      ResponseContent::Report(report) => {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(report.as_bytes())?;
        stdout.flush()?;
      },
    }
    Ok(())
  }
}
