//! Affiliation classification and email discovery.
//!
//! An affiliation is *academic* when it contains one of a fixed list of marker
//! keywords, compared case-insensitively. Every other non-blank affiliation is
//! treated as a *company* affiliation. The heuristic is deliberately simple
//! and will misfile edge cases such as "University Hospital Biotech Partners",
//! so the marker list is pinned as a versioned constant and tests lock it down.
//!
//! # Examples
//!
//! ```
//! use pubscan::classify::{AffiliationClassifier, AffiliationKind};
//!
//! let classifier = AffiliationClassifier::default();
//! assert_eq!(
//!   classifier.classify("Dept. of Biology, State University"),
//!   Some(AffiliationKind::Academic)
//! );
//! assert_eq!(classifier.classify("Acme Therapeutics Inc."), Some(AffiliationKind::Company));
//! assert_eq!(classifier.classify("   "), None);
//! ```

use lazy_static::lazy_static;
use regex::Regex;

use super::*;

/// Version 1 of the academic marker list.
///
/// Changing this list changes classification output, so any edit should ship as
/// a new versioned constant rather than a silent in-place change.
pub const ACADEMIC_MARKERS_V1: &[&str] = &[
  "university",
  "college",
  "institute",
  "school of",
  "hospital",
  "department of",
  "faculty of",
  "medical center",
];

lazy_static! {
  /// Loose `local@domain.tld` shape used to spot contact addresses.
  static ref EMAIL: Regex = Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap();
}

/// Returns the first email-shaped substring of `text`, if any.
pub fn find_email(text: &str) -> Option<&str> { EMAIL.find(text).map(|m| m.as_str()) }

/// How a single affiliation string was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffiliationKind {
  /// Matches at least one academic marker
  Academic,
  /// Matches no academic marker
  Company,
}

/// Marker configuration for an [`AffiliationClassifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierConfig {
  /// Keywords that mark an affiliation as academic, matched case-insensitively
  pub academic_markers: Vec<String>,
}

impl ClassifierConfig {
  /// Adds an extra academic marker on top of the current list.
  pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
    self.academic_markers.push(marker.into());
    self
  }
}

impl Default for ClassifierConfig {
  fn default() -> Self {
    Self { academic_markers: ACADEMIC_MARKERS_V1.iter().map(|m| m.to_string()).collect() }
  }
}

/// Keyword based academic/company classifier.
#[derive(Debug, Clone)]
pub struct AffiliationClassifier {
  /// Lowercased, non-blank markers
  markers: Vec<String>,
}

impl AffiliationClassifier {
  /// Builds a classifier from an explicit marker configuration.
  ///
  /// Markers are lowercased once up front. Blank markers are ignored since they
  /// would match every affiliation.
  pub fn new(config: ClassifierConfig) -> Self {
    let markers = config
      .academic_markers
      .iter()
      .map(|m| m.trim().to_lowercase())
      .filter(|m| !m.is_empty())
      .collect();
    Self { markers }
  }

  /// The markers this classifier matches against.
  pub fn markers(&self) -> &[String] { &self.markers }

  /// Classifies one affiliation string. Blank input has no classification.
  pub fn classify(&self, affiliation: &str) -> Option<AffiliationKind> {
    let affiliation = affiliation.trim();
    if affiliation.is_empty() {
      return None;
    }
    let lowered = affiliation.to_lowercase();
    if self.markers.iter().any(|marker| lowered.contains(marker.as_str())) {
      Some(AffiliationKind::Academic)
    } else {
      Some(AffiliationKind::Company)
    }
  }

  /// Shorthand for `classify(affiliation) == Some(AffiliationKind::Academic)`.
  pub fn is_academic(&self, affiliation: &str) -> bool {
    self.classify(affiliation) == Some(AffiliationKind::Academic)
  }
}

impl Default for AffiliationClassifier {
  fn default() -> Self { Self::new(ClassifierConfig::default()) }
}
