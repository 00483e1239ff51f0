//! PubMed XML record parsing.
//!
//! EFetch returns a `PubmedArticleSet` holding one `PubmedArticle` per identifier. Each record
//! is located in the payload and parsed on its own with a streaming [`quick_xml::Reader`], so a
//! broken record only costs that record. Fields that are missing inside a well-formed record
//! are left empty.
//!
//! Extracted per record:
//!
//! | Field   | Source                                                                  |
//! |---------|-------------------------------------------------------------------------|
//! | pmid    | first `PMID`                                                            |
//! | title   | `ArticleTitle`, including text inside inline markup                     |
//! | date    | `ArticleDate`, else `Journal/JournalIssue/PubDate` (or its `MedlineDate`) |
//! | authors | `AuthorList/Author`, with every `AffiliationInfo/Affiliation`           |

use std::borrow::Cow;

use quick_xml::{events::Event, Reader};

use super::*;
use crate::format::collapse_whitespace;

/// Opening tag prefix of a record. `<PubmedArticleSet>` shares the prefix and is skipped.
const RECORD_OPEN: &str = "<PubmedArticle";
/// Closing tag of a record.
const RECORD_CLOSE: &str = "</PubmedArticle>";

/// Why a single record was dropped.
#[derive(Debug, thiserror::Error)]
enum RecordError {
  /// The reader rejected the markup, e.g. a mismatched end tag.
  #[error(transparent)]
  Xml(#[from] quick_xml::Error),
  /// The record ended with elements still open.
  #[error("record is truncated, <{0}> is never closed")]
  Truncated(String),
}

/// Parses every `PubmedArticle` in an EFetch payload, in document order.
///
/// Malformed records are logged and skipped. A payload without records yields an empty list.
///
/// # Examples
///
/// ```
/// let xml = r#"<PubmedArticleSet><PubmedArticle>
///   <MedlineCitation><PMID>123</PMID><Article>
///     <ArticleTitle>Sample</ArticleTitle>
///     <AuthorList><Author><LastName>Doe</LastName><ForeName>Jane</ForeName></Author></AuthorList>
///   </Article></MedlineCitation>
/// </PubmedArticle></PubmedArticleSet>"#;
///
/// let articles = papersift::xml::parse_articles(xml);
/// assert_eq!(articles[0].pmid, "123");
/// assert_eq!(articles[0].authors[0].name, "Jane Doe");
/// ```
pub fn parse_articles(xml: &str) -> Vec<Article> {
  let mut articles = Vec::new();
  for (index, record) in records(xml).enumerate() {
    match parse_record(record) {
      Ok(article) => articles.push(article),
      Err(e) => warn!("Skipping malformed record #{} in payload: {e}", index + 1),
    }
  }
  debug!("Parsed {} articles from a {} byte payload", articles.len(), xml.len());
  articles
}

/// Splits a payload into the raw text of its records.
fn records(xml: &str) -> Records<'_> { Records { rest: xml } }

/// Iterator over the raw text of each record in a payload.
struct Records<'a> {
  /// Unscanned remainder of the payload
  rest: &'a str,
}

impl<'a> Iterator for Records<'a> {
  type Item = &'a str;

  fn next(&mut self) -> Option<&'a str> {
    let start = find_record_start(self.rest)?;
    let record = &self.rest[start..];
    // A record without its closing tag must not swallow the next one.
    let limit = find_record_start(&record[1..]).map_or(record.len(), |i| i + 1);
    let end = record[..limit].find(RECORD_CLOSE).map_or(limit, |i| i + RECORD_CLOSE.len());
    self.rest = &record[end..];
    Some(&record[..end])
  }
}

/// Byte offset of the next `<PubmedArticle>` (or `<PubmedArticle attr=...>`) tag.
fn find_record_start(xml: &str) -> Option<usize> {
  xml.match_indices(RECORD_OPEN).map(|(i, _)| i).find(|&i| {
    xml[i + RECORD_OPEN.len()..].starts_with(|c: char| c == '>' || c.is_ascii_whitespace())
  })
}

/// Parses the text of a single record.
fn parse_record(record: &str) -> std::result::Result<Article, RecordError> {
  let mut reader = Reader::from_str(record);
  let mut builder = RecordBuilder::default();

  loop {
    match reader.read_event()? {
      Event::Start(e) => builder.start(&String::from_utf8_lossy(e.local_name().as_ref())),
      Event::End(e) => builder.end(&String::from_utf8_lossy(e.local_name().as_ref())),
      Event::Text(e) => {
        let text = e.unescape().map(Cow::into_owned).unwrap_or_else(|_| {
          // Unknown entities (e.g. HTML's &nbsp;) are kept verbatim.
          String::from_utf8_lossy(&e).into_owned()
        });
        builder.text(&text);
      },
      Event::CData(e) => builder.text(&String::from_utf8_lossy(&e)),
      Event::Eof => break,
      _ => (),
    }
  }

  if let Some(open) = builder.path.last() {
    return Err(RecordError::Truncated(open.clone()));
  }
  Ok(builder.finish())
}

/// Raw text of the parts of a date element.
#[derive(Debug, Default)]
struct DateParts {
  /// `Year` text
  year:    String,
  /// `Month` text
  month:   String,
  /// `Day` text
  day:     String,
  /// `MedlineDate` text
  medline: String,
  /// Set once the element closed, later elements of the same kind are ignored
  closed:  bool,
}

impl DateParts {
  /// Appends text from a child element of the date.
  fn text(&mut self, element: &str, text: &str) {
    if self.closed {
      return;
    }
    match element {
      "Year" => self.year.push_str(text),
      "Month" => self.month.push_str(text),
      "Day" => self.day.push_str(text),
      "MedlineDate" => self.medline.push_str(text),
      _ => (),
    }
  }

  /// The most precise date the parts allow.
  fn resolve(&self) -> Option<PublicationDate> {
    PublicationDate::from_parts(&self.year, &self.month, &self.day)
      .or_else(|| PublicationDate::from_medline_date(&self.medline))
  }
}

/// Raw text of an `Author` element.
#[derive(Debug, Default)]
struct AuthorParts {
  /// `LastName`
  last_name:       String,
  /// `ForeName`
  fore_name:       String,
  /// `Initials`, used when there is no fore name
  initials:        String,
  /// `CollectiveName` of group authors
  collective_name: String,
  /// Completed `Affiliation` texts
  affiliations:    Vec<String>,
}

impl AuthorParts {
  /// Builds the author, naming it "ForeName LastName" or by its collective name.
  fn finish(self) -> Author {
    let given = if self.fore_name.trim().is_empty() { &self.initials } else { &self.fore_name };
    let mut name = collapse_whitespace(&format!("{given} {}", self.last_name));
    if name.is_empty() {
      name = collapse_whitespace(&self.collective_name);
    }
    Author::new(name, self.affiliations)
  }
}

/// Accumulates one record while its events stream by.
#[derive(Debug, Default)]
struct RecordBuilder {
  /// Names of the currently open elements, outermost first
  path:         Vec<String>,
  /// First `PMID` text
  pmid:         String,
  /// Set once the first `PMID` closed
  pmid_done:    bool,
  /// `ArticleTitle` text, markup stripped
  title:        String,
  /// Set once the first `ArticleTitle` closed
  title_done:   bool,
  /// Electronic publication date
  article_date: DateParts,
  /// Journal issue date
  issue_date:   DateParts,
  /// Completed authors
  authors:      Vec<Author>,
  /// Author currently open
  author:       Option<AuthorParts>,
  /// Affiliation text currently open
  affiliation:  Option<String>,
}

impl RecordBuilder {
  /// Whether an element with this name is open.
  fn within(&self, name: &str) -> bool { self.path.iter().any(|open| open == name) }

  /// Name of the parent of the innermost open element.
  fn parent(&self) -> Option<&str> {
    self.path.len().checked_sub(2).map(|i| self.path[i].as_str())
  }

  /// Handles an opening tag.
  fn start(&mut self, name: &str) {
    self.path.push(name.to_string());
    match name {
      "Author" if self.parent() == Some("AuthorList") => self.author = Some(AuthorParts::default()),
      "Affiliation" if self.author.is_some() => self.affiliation = Some(String::new()),
      _ => (),
    }
  }

  /// Handles character data inside the innermost open element.
  fn text(&mut self, text: &str) {
    let Some(current) = self.path.last().map(String::as_str) else {
      return;
    };

    if self.within("ArticleTitle") {
      if !self.title_done {
        self.title.push_str(text);
      }
      return;
    }

    if current == "PMID" {
      if !self.pmid_done {
        self.pmid.push_str(text);
      }
      return;
    }

    if let Some(affiliation) = self.affiliation.as_mut() {
      affiliation.push_str(text);
      return;
    }

    if let Some(author) = self.author.as_mut() {
      let in_collective_name = self.path.iter().any(|open| open == "CollectiveName");
      match current {
        "LastName" => author.last_name.push_str(text),
        "ForeName" => author.fore_name.push_str(text),
        "Initials" => author.initials.push_str(text),
        _ if in_collective_name => author.collective_name.push_str(text),
        _ => (),
      }
      return;
    }

    if self.within("ArticleDate") {
      self.article_date.text(current, text);
    } else if self.within("JournalIssue") && self.within("PubDate") {
      self.issue_date.text(current, text);
    }
  }

  /// Handles a closing tag. Mismatched tags are rejected by the reader before this point.
  fn end(&mut self, name: &str) {
    match name {
      "PMID" => self.pmid_done = !self.pmid.trim().is_empty(),
      "ArticleTitle" => self.title_done = true,
      "ArticleDate" => self.article_date.closed = true,
      "PubDate" if self.within("JournalIssue") => self.issue_date.closed = true,
      "Affiliation" =>
        if let (Some(affiliation), Some(author)) = (self.affiliation.take(), self.author.as_mut()) {
          let affiliation = collapse_whitespace(&affiliation);
          if !affiliation.is_empty() {
            author.affiliations.push(affiliation);
          }
        },
      "Author" if self.parent() == Some("AuthorList") =>
        if let Some(author) = self.author.take() {
          self.authors.push(author.finish());
        },
      _ => (),
    }
    self.path.pop();
  }

  /// Turns the collected text into an [`Article`].
  fn finish(self) -> Article {
    let publication_date = self.article_date.resolve().or_else(|| self.issue_date.resolve());
    Article {
      pmid: self.pmid.trim().to_string(),
      title: collapse_whitespace(&self.title),
      publication_date,
      authors: self.authors,
    }
  }
}
