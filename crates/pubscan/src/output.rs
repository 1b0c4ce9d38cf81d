//! CSV serialization of [`OutputRow`]s.
//!
//! The header is fixed and always written, even when there are no rows, so
//! downstream tooling can rely on the column layout. Writing to a path
//! truncates any existing file.

use std::io::Write;

use super::*;

/// Output file used when the caller does not name one.
pub const DEFAULT_OUTPUT_FILE: &str = "pubmed_results.csv";

/// The fixed CSV header. Matches the column names [`OutputRow`] serializes
/// under.
pub const HEADER: [&str; 6] = [
  "PubmedID",
  "Title",
  "Publication Date",
  "Non-Academic Authors",
  "Company Affiliations",
  "Corresponding Author Email",
];

/// Writes the header followed by one record per row to any [`Write`]r.
///
/// Returns the number of data rows written.
pub fn write_rows<W: Write>(writer: W, rows: &[OutputRow]) -> Result<usize, PubscanError> {
  let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
  wtr.write_record(HEADER)?;
  for row in rows {
    wtr.serialize(row)?;
  }
  wtr.flush()?;
  Ok(rows.len())
}

/// Writes rows to `path`, creating or overwriting the file.
pub fn write_csv(path: impl AsRef<Path>, rows: &[OutputRow]) -> Result<usize, PubscanError> {
  let path = path.as_ref();
  debug!("Writing {} rows to {}", rows.len(), path.display());
  let file = std::fs::File::create(path)?;
  write_rows(file, rows)
}
