//! Text formatting utilities for cleaning up PubMed fields.
//!
//! PubMed XML carries titles and affiliations with hard line breaks, inline
//! formatting markup, and dates split across `Year`/`Month`/`Day` elements with
//! inconsistent month spellings. The helpers here turn those into the flat
//! strings written to the CSV.
//!
//! # Examples
//!
//! ```
//! use pubscan::format;
//!
//! assert_eq!(format::collapse_whitespace("  A   study\n of things "), "A study of things");
//! assert_eq!(format::format_publication_date(Some("2023"), Some("03"), Some("7")), "2023-Mar-07");
//! assert_eq!(format::format_publication_date(Some("2021"), None, None), "2021");
//! ```

use std::str::FromStr;

use chrono::Month;
use lazy_static::lazy_static;
use regex::Regex;

use super::*;

lazy_static! {
  /// Inline markup PubMed allows inside `ArticleTitle` and `AbstractText`.
  static ref INLINE_TAG: Regex =
    Regex::new(r"</?(?:i|b|u|sup|sub|em|strong|italic|bold|mml:[a-z]+)(?:\s[^>]*)?/?>").unwrap();
}

/// Collapses every run of whitespace into a single space and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
  text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Removes inline formatting tags such as `<i>` or `<sup>` from raw XML.
///
/// quick-xml's serde support cannot read an element whose text is interleaved
/// with child elements, so these are stripped before deserializing.
pub fn strip_inline_tags(xml: &str) -> String {
  let cleaned = INLINE_TAG.replace_all(xml, "");
  if cleaned.len() != xml.len() {
    trace!("Stripped {} bytes of inline markup", xml.len() - cleaned.len());
  }
  cleaned.into_owned()
}

/// Normalizes a PubMed month value to its three letter abbreviation.
///
/// Accepts numeric months (`"3"`, `"03"`) and English names in either short or
/// long form. Anything unrecognized is returned unchanged.
pub fn month_abbreviation(month: &str) -> String {
  let month = month.trim();
  let parsed = match month.parse::<u8>() {
    Ok(number) => Month::try_from(number).ok(),
    Err(_) => Month::from_str(month).ok(),
  };
  match parsed {
    Some(m) => m.name()[..3].to_string(),
    None => month.to_string(),
  }
}

/// Formats a publication date as `YYYY-Mon-DD`.
///
/// Missing parts are dropped rather than replaced, so a record with only a
/// year yields `"2021"` and one without a day yields `"2021-Jan"`. Numeric days
/// are zero padded. When no part is present the result is [`NOT_AVAILABLE`].
pub fn format_publication_date(year: Option<&str>, month: Option<&str>, day: Option<&str>) -> String {
  let mut parts = Vec::new();
  if let Some(year) = year.map(str::trim).filter(|y| !y.is_empty()) {
    parts.push(year.to_string());
  }
  if let Some(month) = month.map(str::trim).filter(|m| !m.is_empty()) {
    parts.push(month_abbreviation(month));
  }
  if let Some(day) = day.map(str::trim).filter(|d| !d.is_empty()) {
    match day.parse::<u8>() {
      Ok(number) => parts.push(format!("{number:02}")),
      Err(_) => parts.push(day.to_string()),
    }
  }

  if parts.is_empty() {
    return NOT_AVAILABLE.to_string();
  }
  parts.join("-")
}

/// Formats a free-text `MedlineDate` such as `"2023 Jan-Feb"` in the same
/// dash separated style as [`format_publication_date`].
pub fn format_medline_date(medline_date: &str) -> String {
  let formatted = medline_date.split_whitespace().collect::<Vec<&str>>().join("-");
  if formatted.is_empty() {
    return NOT_AVAILABLE.to_string();
  }
  formatted
}
