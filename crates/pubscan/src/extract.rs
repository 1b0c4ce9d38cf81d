//! Turning a [`PaperRecord`] into a flat [`OutputRow`].
//!
//! Extraction never fails. A record with missing pieces still produces a row,
//! with empty author/company columns or the [`NOT_AVAILABLE`] sentinel.
//!
//! The rules, per author, are:
//! - authors without affiliation text are ignored entirely,
//! - every affiliation matching no academic marker is a company affiliation,
//! - an author with at least one company affiliation is a non-academic author.
//!
//! Company affiliations are de-duplicated per paper, keeping first-seen order.

use std::collections::HashSet;

use super::*;
use crate::classify::AffiliationKind;

/// Separator used when joining author names and company affiliations.
pub const LIST_SEPARATOR: &str = ", ";

/// One CSV line of output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
  /// PubMed identifier
  #[serde(rename = "PubmedID")]
  pub pubmed_id:            String,
  /// Article title
  #[serde(rename = "Title")]
  pub title:                String,
  /// `YYYY-Mon-DD` style publication date
  #[serde(rename = "Publication Date")]
  pub publication_date:     String,
  /// Comma joined names of non-academic authors
  #[serde(rename = "Non-Academic Authors")]
  pub non_academic_authors: String,
  /// Comma joined, de-duplicated company affiliations
  #[serde(rename = "Company Affiliations")]
  pub company_affiliations: String,
  /// First email found in any affiliation, or [`NOT_AVAILABLE`]
  #[serde(rename = "Corresponding Author Email")]
  pub corresponding_email:  String,
}

impl OutputRow {
  /// Builds the output row for one record.
  pub fn from_record(record: &PaperRecord, classifier: &AffiliationClassifier) -> Self {
    let mut non_academic_authors = Vec::new();
    let mut company_affiliations: Vec<&str> = Vec::new();
    let mut seen = HashSet::new();

    for author in record.authors.iter().filter(|a| a.has_affiliation()) {
      let companies: Vec<&str> = author
        .affiliations
        .iter()
        .map(String::as_str)
        .filter(|a| classifier.classify(a) == Some(AffiliationKind::Company))
        .collect();

      if companies.is_empty() {
        continue;
      }
      non_academic_authors.push(author.name.as_str());
      for company in companies {
        if seen.insert(company) {
          company_affiliations.push(company);
        }
      }
    }

    let corresponding_email = corresponding_email(&record.authors);
    debug!(
      pmid = %record.identifier,
      non_academic = non_academic_authors.len(),
      companies = company_affiliations.len(),
      "Extracted output row"
    );

    Self {
      pubmed_id: record.identifier.clone(),
      title: record.title.clone(),
      publication_date: record.publication_date.clone(),
      non_academic_authors: non_academic_authors.join(LIST_SEPARATOR),
      company_affiliations: company_affiliations.join(LIST_SEPARATOR),
      corresponding_email,
    }
  }

}

/// First author email in author order. Each author's email is already the
/// first one found in their own affiliations.
fn corresponding_email(authors: &[Author]) -> String {
  authors
    .iter()
    .find_map(|author| author.email.clone())
    .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
