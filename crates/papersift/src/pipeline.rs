//! Drives one query from search to report rows.
//!
//! A [`Pipeline`] owns a [`LiteratureSource`] and a [`Classifier`]. Running it searches once,
//! fetches the identifiers in batches (strictly one request at a time), parses every payload
//! and keeps the articles with an industry-affiliated author. Any search or fetch failure
//! aborts the run; a record that fails to parse only costs that record.

use super::*;
use crate::xml::parse_articles;

/// Progress reported after each fetched batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
  /// Batches fetched so far
  pub completed: usize,
  /// Batches this run will fetch
  pub total:     usize,
}

/// Search, fetch, parse and classify for a single query.
#[derive(Debug)]
pub struct Pipeline<S> {
  /// Where identifiers and records come from
  source:      S,
  /// Decides which affiliations are industry
  classifier:  Classifier,
  /// Identifiers per fetch request
  batch_size:  usize,
  /// Maximum title length in the rows
  title_width: usize,
}

impl<S: LiteratureSource> Pipeline<S> {
  /// Creates a pipeline with the default batch size and title width.
  pub fn new(source: S, classifier: Classifier) -> Self {
    Self { source, classifier, batch_size: DEFAULT_BATCH_SIZE, title_width: DEFAULT_TITLE_WIDTH }
  }

  /// Sets the number of identifiers per fetch request.
  ///
  /// Values outside `1..=MAX_BATCH_SIZE` are clamped into that range.
  pub fn with_batch_size(mut self, batch_size: usize) -> Self {
    let clamped = batch_size.clamp(1, MAX_BATCH_SIZE);
    if clamped != batch_size {
      warn!("Batch size {batch_size} is out of range, using {clamped}");
    }
    self.batch_size = clamped;
    self
  }

  /// Sets the width titles are shortened to.
  pub fn with_title_width(mut self, title_width: usize) -> Self {
    self.title_width = title_width;
    self
  }

  /// Identifiers per fetch request.
  pub fn batch_size(&self) -> usize { self.batch_size }

  /// The underlying source.
  pub fn source(&self) -> &S { &self.source }

  /// Runs `query`, keeping at most `limit` identifiers.
  pub async fn run(&self, query: &str, limit: usize) -> Result<Report> {
    self.run_with(query, limit, |_| {}).await
  }

  /// Like [`Pipeline::run`], calling `on_batch` once before the first fetch (with
  /// `completed == 0`) and again after every fetched batch.
  ///
  /// `on_batch` is not called at all when the search returns nothing.
  pub async fn run_with<F>(&self, query: &str, limit: usize, mut on_batch: F) -> Result<Report>
  where F: FnMut(BatchProgress) {
    info!("Searching for {query:?} (limit {limit})");
    let mut ids = self.source.search(query, limit).await?;
    ids.truncate(limit);

    let mut report = Report { identifiers: ids.len(), ..Default::default() };
    if ids.is_empty() {
      info!("Search returned no identifiers");
      return Ok(report);
    }

    let total = ids.len().div_ceil(self.batch_size);
    on_batch(BatchProgress { completed: 0, total });

    let builder = RowBuilder::new(&self.classifier, self.title_width);
    for (index, batch) in ids.chunks(self.batch_size).enumerate() {
      debug!("Fetching batch {}/{total} ({} IDs)", index + 1, batch.len());
      let payload = self.source.fetch(batch).await?;

      let articles = parse_articles(&payload);
      if articles.len() != batch.len() {
        debug!("Batch {} asked for {} records and got {}", index + 1, batch.len(), articles.len());
      }
      report.articles += articles.len();
      report.rows.extend(builder.build_all(&articles));

      on_batch(BatchProgress { completed: index + 1, total });
    }

    info!(
      "Kept {} of {} articles ({} identifiers)",
      report.rows.len(),
      report.articles,
      report.identifiers
    );
    Ok(report)
  }
}
