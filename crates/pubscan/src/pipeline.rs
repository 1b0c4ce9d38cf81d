//! The end-to-end search → fetch → extract → write run.
//!
//! Every step runs in sequence and each request finishes before the next one
//! starts. Search and write failures abort the run. Failed record fetches are
//! dropped and reported in [`RunSummary::skipped`].

use super::*;

/// Rows produced for a query, before anything is written.
#[derive(Debug, Default)]
pub struct Collected {
  /// Number of identifiers the search returned
  pub requested: usize,
  /// One row per successfully fetched record, in search order
  pub rows:      Vec<OutputRow>,
  /// Identifiers whose records could not be fetched
  pub skipped:   Vec<String>,
}

impl Collected {
  /// Writes the rows to `path` and reports what the run did.
  ///
  /// The file is written even when the search matched nothing, in which case
  /// it holds only the header.
  ///
  /// # Errors
  ///
  /// Returns any error creating or writing `path`.
  pub fn write_csv(self, path: impl AsRef<Path>) -> Result<RunSummary, PubscanError> {
    let path = path.as_ref();
    let written = output::write_csv(path, &self.rows)?;
    info!("Results saved to {}", path.display());
    Ok(RunSummary { requested: self.requested, written, skipped: self.skipped })
  }
}

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
  /// Number of identifiers the search returned
  pub requested: usize,
  /// Number of data rows written to the CSV
  pub written:   usize,
  /// Identifiers whose records could not be fetched
  pub skipped:   Vec<String>,
}

/// Ties the PubMed client, the classifier, and the CSV writer together.
pub struct Pipeline {
  /// Client used for search and fetch
  client:     PubMedClient,
  /// Classifier applied to every affiliation
  classifier: AffiliationClassifier,
}

impl Pipeline {
  /// Creates a pipeline from its two collaborators.
  pub fn new(client: PubMedClient, classifier: AffiliationClassifier) -> Self {
    Self { client, classifier }
  }

  /// Runs search, fetch, and extraction, returning the rows without writing.
  ///
  /// # Errors
  ///
  /// Only search errors are returned. Fetch failures land in
  /// [`Collected::skipped`].
  pub async fn collect(&self, query: &str) -> Result<Collected, PubscanError> {
    info!("Fetching papers for query: {query}");
    let ids = self.client.search(query).await?;
    if ids.is_empty() {
      info!("Search returned no identifiers");
      return Ok(Collected::default());
    }

    let fetched = self.client.fetch_records(&ids).await;
    let rows: Vec<OutputRow> = fetched
      .records
      .iter()
      .map(|record| OutputRow::from_record(record, &self.classifier))
      .collect();

    info!(
      requested = ids.len(),
      fetched = rows.len(),
      skipped = fetched.skipped.len(),
      "Extraction done"
    );
    Ok(Collected { requested: ids.len(), rows, skipped: fetched.skipped })
  }

  /// Runs the full pipeline and writes the CSV to `path`.
  ///
  /// Equivalent to [`Pipeline::collect`] followed by [`Collected::write_csv`].
  ///
  /// # Errors
  ///
  /// Returns search errors and any error writing `path`.
  pub async fn run(&self, query: &str, path: impl AsRef<Path>) -> Result<RunSummary, PubscanError> {
    self.collect(query).await?.write_csv(path)
  }
}
