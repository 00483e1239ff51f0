//! Command line front end for the `papersift` library.
//!
//! `get-papers-list` runs a PubMed query and lists the papers that have at least one author
//! affiliated with a pharmaceutical or biotech company.
//!
//! # Usage
//!
//! ```bash
//! # Print the report as CSV
//! get-papers-list "CRISPR AND sickle cell"
//!
//! # Save it instead, looking at no more than 200 results
//! get-papers-list "CRISPR AND sickle cell" --limit 200 --file crispr.csv
//!
//! # Tab separated, with debug logging on stderr
//! get-papers-list "mRNA vaccine" --delimiter $'\t' --debug
//! ```
//!
//! Settings that are not flags (NCBI email and API key, classifier keyword lists, timeouts)
//! come from a TOML file, see `config/papersift.toml`. Only the report is written to stdout;
//! logs, progress and errors go to stderr. A failed run exits with status 1.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{path::PathBuf, process::ExitCode};

use clap::{builder::ArgAction, Parser};
use papersift::{
  classifier::Classifier, config::Config, entrez::EntrezClient, pipeline::Pipeline,
  report::ReportWriter,
};
use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

pub mod error;
pub mod interaction;
pub mod progress;

use crate::{error::*, interaction::*, progress::*};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(
  name = "get-papers-list",
  author,
  version,
  about = "Fetch PubMed papers with at least one pharmaceutical or biotech affiliated author"
)]
pub struct Cli {
  /// PubMed query, using the full PubMed search syntax
  query: String,

  /// Write the report to this file instead of printing it
  #[arg(short, long, value_name = "CSV_FILE")]
  file: Option<PathBuf>,

  /// Print debug information during execution
  #[arg(short, long)]
  debug: bool,

  /// Maximum number of search results to process
  #[arg(short, long, default_value_t = 1000)]
  limit: usize,

  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(short, long, action = ArgAction::Count, help = "Increase logging verbosity")]
  verbose: u8,

  /// TOML configuration file. Defaults to the platform config directory if present.
  #[arg(short, long, value_name = "PATH")]
  config: Option<PathBuf>,

  /// Field delimiter of the report, overrides the configuration
  #[arg(long, value_name = "CHAR")]
  delimiter: Option<char>,

  /// Identifiers per fetch request (at most 300), overrides the configuration
  #[arg(long, value_name = "N")]
  batch_size: Option<usize>,
}

/// Configures the logging system based on the verbosity level
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug, also selected by `--debug`
/// - 4+: trace
///
/// `RUST_LOG` takes precedence over both flags. Logs are written to stderr.
fn setup_logging(verbosity: u8, debug: bool) {
  let verbosity = if debug { verbosity.max(3) } else { verbosity };
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_thread_ids(true)
    .with_target(true)
    .init();
}

/// Loads the configuration and applies the command line overrides.
fn load_config(cli: &Cli) -> Result<Config> {
  let mut config = Config::load(cli.config.as_deref())?;
  if let Some(batch_size) = cli.batch_size {
    config.entrez.batch_size = batch_size;
  }
  if let Some(delimiter) = cli.delimiter {
    config.report.delimiter = delimiter;
  }
  config.validate()?;
  trace!("Effective configuration: {config:?}");
  Ok(config)
}

/// Runs one query and emits the report.
async fn run<I: UserInteraction>(interaction: &I, cli: &Cli) -> Result<()> {
  let config = load_config(cli)?;
  let writer = ReportWriter::from_config(&config.report)?;
  let classifier = Classifier::from_config(&config.classifier)?;
  let client = EntrezClient::new(config.entrez.clone())?;
  let pipeline = Pipeline::new(client, classifier)
    .with_batch_size(config.entrez.batch_size)
    .with_title_width(config.report.title_width);

  interaction.reply(ResponseContent::Info(&format!("Query: {}", cli.query)))?;

  let mut progress = DownloadProgress::new()?;
  let result = pipeline.run_with(&cli.query, cli.limit, |update| progress.update(update)).await;
  progress.finish();
  let report = result?;
  debug!(
    "{} identifiers, {} articles parsed, {} rows",
    report.identifiers,
    report.articles,
    report.rows.len()
  );

  match &cli.file {
    Some(path) => {
      writer.write_to_path(&report.rows, path)?;
      interaction.reply(ResponseContent::Success(&format!(
        "Saved {} rows to {}",
        report.rows.len(),
        path.display()
      )))
    },
    None if report.is_empty() => {
      interaction.reply(ResponseContent::Warning("No matching papers found."))
    },
    None => interaction.reply(ResponseContent::Report(&writer.render(&report.rows)?)),
  }
}

/// Entry point for the `get-papers-list` binary
///
/// Parses the arguments, sets up logging and runs the query. Any error is printed to stderr
/// and turns into exit status 1.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
  let cli = Cli::parse();
  setup_logging(cli.verbose, cli.debug);

  let terminal = Terminal;
  match run(&terminal, &cli).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      // Nothing sensible is left to do if stderr itself is gone.
      let _ = terminal.reply(ResponseContent::Error(&e));
      ExitCode::FAILURE
    },
  }
}
