//! Parsed PubMed records.
//!
//! [`Article`] and [`Author`] are produced by [`crate::xml::parse_articles`] and consumed by
//! the report builder. They carry only what the report needs.

use chrono::Month;

use super::*;

lazy_static! {
  /// Loose email matcher used on affiliation text.
  static ref EMAIL: Regex = Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap();
  /// First four digit year in free-form dates such as `MedlineDate`.
  static ref YEAR: Regex = Regex::new(r"\b(\d{4})\b").unwrap();
}

/// One PubMed record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
  /// PubMed identifier (PMID)
  pub pmid:             String,
  /// Article title with whitespace collapsed, empty if the record has none
  pub title:            String,
  /// Best available publication date
  pub publication_date: Option<PublicationDate>,
  /// Authors in the order they are listed
  pub authors:          Vec<Author>,
}

/// An author of an [`Article`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
  /// Display name, "ForeName LastName" or the collective name for group authors
  pub name:         String,
  /// Raw affiliation strings, one per `AffiliationInfo`
  pub affiliations: Vec<String>,
  /// First email address found in the affiliations
  pub email:        Option<String>,
}

/// A publication date with optional month and day.
///
/// PubMed dates are often partial. The value renders with as much precision as it has:
///
/// ```
/// use papersift::article::PublicationDate;
///
/// assert_eq!(PublicationDate::from_parts("2024", "May", "01").unwrap().to_string(), "2024-05-01");
/// assert_eq!(PublicationDate::from_parts("2024", "05", "").unwrap().to_string(), "2024-05");
/// assert_eq!(PublicationDate::from_parts("2024", "", "17").unwrap().to_string(), "2024");
/// assert!(PublicationDate::from_parts("", "05", "01").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PublicationDate {
  /// Four digit year
  pub year:  i32,
  /// Month, 1 to 12
  pub month: Option<u32>,
  /// Day of month, only kept when the month is known
  pub day:   Option<u32>,
}

impl Author {
  /// Builds an author and extracts the first email from the affiliations.
  pub fn new(name: impl Into<String>, affiliations: Vec<String>) -> Self {
    let email = affiliations.iter().find_map(|affiliation| first_email(affiliation));
    Self { name: name.into(), affiliations, email }
  }
}

impl Article {
  /// First email address among the authors, in author order.
  pub fn corresponding_email(&self) -> Option<&str> {
    self.authors.iter().find_map(|author| author.email.as_deref())
  }
}

impl PublicationDate {
  /// Builds a date from the text of `Year`, `Month` and `Day` elements.
  ///
  /// The month may be numeric ("05") or a name ("May", "Sep"). Parts that do not parse are
  /// dropped, and a day without a month is dropped as well. Returns `None` without a year.
  pub fn from_parts(year: &str, month: &str, day: &str) -> Option<Self> {
    let year = year.trim().parse::<i32>().ok()?;
    let month = parse_month(month);
    let day = month.and(day.trim().parse::<u32>().ok()).filter(|d| (1..=31).contains(d));
    Some(Self { year, month, day })
  }

  /// Extracts the year from a free-form `MedlineDate` such as "2019 Nov-Dec".
  pub fn from_medline_date(text: &str) -> Option<Self> {
    let year = YEAR.captures(text)?.get(1)?.as_str().parse().ok()?;
    Some(Self { year, month: None, day: None })
  }
}

impl Display for PublicationDate {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:04}", self.year)?;
    if let Some(month) = self.month {
      write!(f, "-{month:02}")?;
      if let Some(day) = self.day {
        write!(f, "-{day:02}")?;
      }
    }
    Ok(())
  }
}

/// Parses a numeric or named month.
fn parse_month(text: &str) -> Option<u32> {
  let text = text.trim();
  if text.is_empty() {
    return None;
  }
  match text.parse::<u32>() {
    Ok(month) => Some(month).filter(|m| (1..=12).contains(m)),
    Err(_) => Month::from_str(text).ok().map(|month| month.number_from_month()),
  }
}

/// Extracts the first email address from free text.
pub fn first_email(text: &str) -> Option<String> {
  EMAIL.find(text).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_month_names_and_numbers() {
    let test_cases = [
      ("2023", "Jan", "5", "2023-01-05"),
      ("2023", "january", "", "2023-01"),
      ("2023", "12", "31", "2023-12-31"),
      ("2023", "13", "01", "2023"),
      ("2023", "Spring", "", "2023"),
      ("2023", "", "", "2023"),
      (" 1999 ", " Sep ", " 9 ", "1999-09-09"),
    ];

    for (year, month, day, expected) in test_cases {
      let date = PublicationDate::from_parts(year, month, day).unwrap();
      assert_eq!(date.to_string(), expected, "for {year:?}/{month:?}/{day:?}");
    }
  }

  #[test]
  fn test_medline_date() {
    assert_eq!(PublicationDate::from_medline_date("2019 Nov-Dec").unwrap().to_string(), "2019");
    assert_eq!(PublicationDate::from_medline_date("Winter 1998-1999").unwrap().year, 1998);
    assert!(PublicationDate::from_medline_date("Winter").is_none());
  }

  #[test]
  fn test_email_extraction() {
    let author = Author::new("Jane Doe", vec![
      "Acme Biotech Inc., Boston".into(),
      "Electronic address: jane.doe@acme-bio.com.".into(),
      "second@example.org".into(),
    ]);
    assert_eq!(author.email.as_deref(), Some("jane.doe@acme-bio.com"));
    assert!(Author::new("No Mail", vec!["Somewhere".into()]).email.is_none());
  }

  #[test]
  fn test_corresponding_email_in_author_order() {
    let article = Article {
      authors: vec![
        Author::new("A", vec!["Nowhere".into()]),
        Author::new("B", vec!["b@example.org".into()]),
        Author::new("C", vec!["c@example.org".into()]),
      ],
      ..Default::default()
    };
    assert_eq!(article.corresponding_email(), Some("b@example.org"));
  }
}
