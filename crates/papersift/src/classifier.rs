//! Company versus academic affiliation rules.
//!
//! An affiliation counts as industry when it matches one of the company keywords and none of
//! the academic keywords. Academic keywords win over company keywords, so
//! "Department of Pharmacology, University of Oxford" is academic even though it contains
//! "pharm".
//!
//! The keyword lists are data, see [`ClassifierConfig`]. The built-in lists are
//! [`DEFAULT_COMPANY_PATTERNS`] and [`DEFAULT_ACADEMIC_PATTERNS`].
//!
//! # Examples
//!
//! ```
//! use papersift::{classifier::Classifier, config::ClassifierConfig};
//!
//! let classifier = Classifier::from_config(&ClassifierConfig::default())?;
//!
//! let company = classifier.classify("Acme Biotech Inc., Boston, MA, USA");
//! assert!(company.industry);
//! assert_eq!(company.company.as_deref(), Some("Acme Biotech Inc."));
//!
//! assert!(!classifier.classify("Harvard Medical School, Boston").industry);
//! # Ok::<(), papersift::error::SiftError>(())
//! ```

use regex::RegexBuilder;

use super::*;

/// Company keywords used when the configuration does not provide its own.
pub const DEFAULT_COMPANY_PATTERNS: &[&str] = &[
  "pharm",
  "biotech",
  "therapeutics",
  r"\binc\b",
  r"\bltd\b",
  r"\bllc\b",
  r"\bgmbh\b",
  r"\bcorp\b",
  r"\bcorporation\b",
  r"(?:^|[\s,])s\.\s?a\.",
  r"\bplc\b",
  r"\bk\.k\.",
  r"\bco\.,?\s?ltd\b",
];

/// Academic keywords used when the configuration does not provide its own.
pub const DEFAULT_ACADEMIC_PATTERNS: &[&str] = &[
  "univ",
  "college",
  "academy",
  "school",
  "hospital",
  "centre",
  "center",
  "institut",
  "facult",
  r"\bdept\b",
  "department",
];

/// Compiled keyword lists.
///
/// Building a classifier compiles each list into one case-insensitive regular expression.
/// Classification itself is a pure function of the affiliation text.
#[derive(Debug, Clone)]
pub struct Classifier {
  /// Alternation of all company fragments
  company:  Regex,
  /// Alternation of all academic fragments, `None` when the list is empty
  academic: Option<Regex>,
}

/// Outcome of classifying one affiliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
  /// The affiliation matched a company keyword and no academic keyword
  pub industry: bool,
  /// The affiliation matched an academic keyword
  pub academic: bool,
  /// The literal text of the first company keyword match
  pub token:    Option<String>,
  /// Best-effort company name: the comma separated part of the affiliation holding `token`
  pub company:  Option<String>,
}

impl Classifier {
  /// Compiles the keyword lists of a [`ClassifierConfig`].
  ///
  /// # Errors
  ///
  /// Returns [`SiftError::InvalidPattern`] naming the first fragment that does not compile,
  /// and [`SiftError::Config`] if there are no company fragments at all.
  pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
    let company = compile(&config.company_patterns)?
      .ok_or_else(|| SiftError::Config("classifier needs at least one company pattern".into()))?;
    let academic = compile(&config.academic_patterns)?;
    Ok(Self { company, academic })
  }

  /// Classifies a single affiliation string.
  pub fn classify(&self, affiliation: &str) -> Classification {
    let affiliation = affiliation.trim();
    let academic = self.academic.as_ref().is_some_and(|re| re.is_match(affiliation));

    let Some(found) = self.company.find(affiliation) else {
      return Classification { academic, ..Default::default() };
    };

    // Some fragments consume the separator in front of the keyword.
    let token = found.as_str().trim_start_matches(|c: char| c == ',' || c.is_whitespace());
    let classification = Classification {
      industry: !academic,
      academic,
      token: Some(token.to_string()),
      company: Some(company_segment(affiliation, found.end() - token.len()).to_string()),
    };
    trace!("Classified {affiliation:?} as {classification:?}");
    classification
  }

  /// Shorthand for `self.classify(affiliation).industry`.
  pub fn is_industry(&self, affiliation: &str) -> bool { self.classify(affiliation).industry }
}

/// Joins fragments into a single case-insensitive alternation.
///
/// Fragments are compiled one by one first so a broken entry is reported by name rather than
/// as part of the combined expression.
fn compile(patterns: &[String]) -> Result<Option<Regex>> {
  if patterns.is_empty() {
    return Ok(None);
  }

  for pattern in patterns {
    RegexBuilder::new(pattern)
      .case_insensitive(true)
      .build()
      .map_err(|source| SiftError::InvalidPattern { pattern: pattern.clone(), source })?;
  }

  let combined = patterns.iter().map(|p| format!("(?:{p})")).collect::<Vec<_>>().join("|");
  RegexBuilder::new(&combined)
    .case_insensitive(true)
    .build()
    .map(Some)
    .map_err(|source| SiftError::InvalidPattern { pattern: combined, source })
}

/// Returns the `,`/`;` separated part of `affiliation` that contains byte offset `at`.
fn company_segment(affiliation: &str, at: usize) -> &str {
  let is_separator = |c: char| c == ',' || c == ';';
  let start = affiliation[..at].rfind(is_separator).map_or(0, |i| i + 1);
  let end = affiliation[at..].find(is_separator).map_or(affiliation.len(), |i| at + i);
  affiliation[start..end].trim()
}
