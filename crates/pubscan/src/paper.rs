//! Record types for papers retrieved from PubMed.
//!
//! A [`PaperRecord`] is the parsed form of one `efetch` response: the PMID it was
//! requested under, its title, a display-ready publication date, and the ordered
//! author list. Records are transient and only live for the duration of a run.
//!
//! # Examples
//!
//! ```
//! use pubscan::paper::{Author, PaperRecord};
//!
//! let record = PaperRecord {
//!   identifier:       "12345".into(),
//!   title:            "A study".into(),
//!   publication_date: "2023-Mar-07".into(),
//!   authors:          vec![Author::new("Jane Doe", vec!["Acme Biotech Inc".into()])],
//! };
//! assert_eq!(record.authors[0].affiliations.len(), 1);
//! ```

use super::*;

/// An author of a paper together with the affiliation text PubMed lists for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
  /// Display name, "ForeName LastName" or a collective name
  pub name:         String,
  /// Affiliation strings in the order PubMed lists them, blank entries removed
  pub affiliations: Vec<String>,
  /// First email address found in this author's affiliations, if any
  pub email:        Option<String>,
}

impl Author {
  /// Creates an author, dropping blank affiliations and picking up an email if
  /// one of the affiliations carries one.
  pub fn new(name: impl Into<String>, affiliations: Vec<String>) -> Self {
    let affiliations: Vec<String> = affiliations
      .into_iter()
      .map(|a| format::collapse_whitespace(&a))
      .filter(|a| !a.is_empty())
      .collect();
    let email =
      affiliations.iter().find_map(|a| classify::find_email(a)).map(|email| email.to_string());
    Self { name: name.into(), affiliations, email }
  }

  /// Whether PubMed listed any affiliation text for this author.
  pub fn has_affiliation(&self) -> bool { !self.affiliations.is_empty() }
}

/// One paper as retrieved from PubMed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperRecord {
  /// The PMID the record was requested under
  pub identifier:       String,
  /// Article title, or [`NOT_AVAILABLE`] when PubMed has none
  pub title:            String,
  /// Publication date formatted as `YYYY-Mon-DD` with missing parts dropped
  pub publication_date: String,
  /// Authors in the order PubMed lists them
  pub authors:          Vec<Author>,
}
