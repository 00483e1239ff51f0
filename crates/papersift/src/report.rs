//! Report rows and the delimited writer.
//!
//! One [`Row`] is produced per article that has at least one industry-affiliated author.
//! Rows keep the order the articles were fetched in; within a row, author names and company
//! names are de-duplicated and sorted so the output is stable across runs.

use std::{collections::BTreeSet, fs::File, io};

use csv::WriterBuilder;

use super::*;
use crate::format::shorten;

/// Column names, in output order.
pub const HEADERS: [&str; 6] = [
  "PubmedID",
  "Title",
  "Publication Date",
  "Non-academic Author(s)",
  "Company Affiliation(s)",
  "Corresponding Author Email",
];

/// Placeholder for values the record does not provide.
pub const MISSING: &str = "N/A";

/// Separator between multiple names in one cell.
pub const LIST_SEPARATOR: &str = "; ";

/// One line of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
  /// PubMed identifier
  #[serde(rename = "PubmedID")]
  pub pmid:                 String,
  /// Shortened title, or `N/A`
  #[serde(rename = "Title")]
  pub title:                String,
  /// Publication date with the precision available, or `N/A`
  #[serde(rename = "Publication Date")]
  pub publication_date:     String,
  /// Industry-affiliated author names joined with `"; "`
  #[serde(rename = "Non-academic Author(s)")]
  pub non_academic_authors: String,
  /// Company names joined with `"; "`
  #[serde(rename = "Company Affiliation(s)")]
  pub company_affiliations: String,
  /// First email found among the authors, or `N/A`
  #[serde(rename = "Corresponding Author Email")]
  pub corresponding_email:  String,
}

/// The outcome of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
  /// Identifiers returned by the search
  pub identifiers: usize,
  /// Records parsed from the fetched payloads
  pub articles:    usize,
  /// Qualifying articles, in fetch order
  pub rows:        Vec<Row>,
}

impl Report {
  /// Whether no article qualified.
  pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

/// Turns articles into rows using a [`Classifier`].
#[derive(Debug, Clone, Copy)]
pub struct RowBuilder<'a> {
  /// Decides which affiliations are industry
  classifier:  &'a Classifier,
  /// Maximum title length in characters
  title_width: usize,
}

impl<'a> RowBuilder<'a> {
  /// Creates a builder that shortens titles to `title_width` characters.
  pub fn new(classifier: &'a Classifier, title_width: usize) -> Self {
    Self { classifier, title_width }
  }

  /// Builds the row for `article`, or `None` if no author is industry-affiliated.
  pub fn build(&self, article: &Article) -> Option<Row> {
    let mut authors = BTreeSet::new();
    let mut companies = BTreeSet::new();

    for author in &article.authors {
      for affiliation in &author.affiliations {
        let classification = self.classifier.classify(affiliation);
        if classification.industry {
          authors.insert(author.name.as_str());
          companies.insert(classification.company.unwrap_or_else(|| affiliation.clone()));
        }
      }
    }

    if authors.is_empty() {
      trace!("PMID {} has no industry-affiliated authors", article.pmid);
      return None;
    }

    let title = if article.title.is_empty() {
      MISSING.to_string()
    } else {
      shorten(&article.title, self.title_width)
    };

    Some(Row {
      pmid: article.pmid.clone(),
      title,
      publication_date: article
        .publication_date
        .map_or_else(|| MISSING.to_string(), |date| date.to_string()),
      non_academic_authors: authors.into_iter().collect::<Vec<_>>().join(LIST_SEPARATOR),
      company_affiliations: companies.into_iter().collect::<Vec<_>>().join(LIST_SEPARATOR),
      corresponding_email: article.corresponding_email().unwrap_or(MISSING).to_string(),
    })
  }

  /// Builds rows for every qualifying article, keeping their order.
  pub fn build_all(&self, articles: &[Article]) -> Vec<Row> {
    articles.iter().filter_map(|article| self.build(article)).collect()
  }
}

/// Writes rows as a delimited table with a header line.
///
/// # Examples
///
/// ```
/// use papersift::report::{ReportWriter, Row};
///
/// let row = Row {
///   pmid:                 "1".into(),
///   title:                "A title, with a comma".into(),
///   publication_date:     "2024".into(),
///   non_academic_authors: "Jane Doe".into(),
///   company_affiliations: "Acme Pharma Inc".into(),
///   corresponding_email:  "N/A".into(),
/// };
///
/// let csv = ReportWriter::new(b',').render(&[row])?;
/// assert!(csv.ends_with("1,\"A title, with a comma\",2024,Jane Doe,Acme Pharma Inc,N/A\n"));
/// # Ok::<(), papersift::error::SiftError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ReportWriter {
  /// Field delimiter
  delimiter: u8,
}

impl Default for ReportWriter {
  fn default() -> Self { Self::new(b',') }
}

impl ReportWriter {
  /// Creates a writer with the given single-byte delimiter.
  pub fn new(delimiter: u8) -> Self { Self { delimiter } }

  /// Creates a writer from the `[report]` configuration section.
  pub fn from_config(config: &ReportConfig) -> Result<Self> {
    if !config.delimiter.is_ascii() {
      return Err(SiftError::Config(format!(
        "delimiter must be a single ASCII character, got {:?}",
        config.delimiter
      )));
    }
    Ok(Self::new(config.delimiter as u8))
  }

  /// Writes the header and every row to `out`.
  ///
  /// The header is written even when there are no rows.
  pub fn write<W: io::Write>(&self, rows: &[Row], out: W) -> Result<()> {
    let mut writer =
      WriterBuilder::new().delimiter(self.delimiter).has_headers(false).from_writer(out);
    writer.write_record(HEADERS)?;
    for row in rows {
      writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
  }

  /// Writes the report to a file, replacing any existing content.
  pub fn write_to_path(&self, rows: &[Row], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    debug!("Writing {} rows to {}", rows.len(), path.display());
    self.write(rows, File::create(path)?)
  }

  /// Renders the report into a string.
  pub fn render(&self, rows: &[Row]) -> Result<String> {
    let mut buffer = Vec::new();
    self.write(rows, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
  }
}
