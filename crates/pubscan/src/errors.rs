//! Error types for the pubscan library.
//!
//! Errors fall into two tiers. Search failures and output write failures abort
//! the whole run, while failures on a single record are logged by the pipeline
//! and the record is skipped. Both tiers share this one error type so callers
//! can decide how to react.
//!
//! # Examples
//!
//! ```no_run
//! use pubscan::{clients::PubMedClient, errors::PubscanError};
//!
//! # async fn example() -> Result<(), PubscanError> {
//! let result = PubMedClient::new()?.search("").await;
//! match result {
//!   Err(PubscanError::EmptyQuery) => println!("Nothing to search for"),
//!   Err(PubscanError::Network(e)) => println!("Network error: {}", e),
//!   Err(e) => println!("Other error: {}", e),
//!   Ok(ids) => println!("Found {} records", ids.len()),
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

/// Errors that can occur while searching, fetching, or writing results.
#[derive(Error, Debug)]
pub enum PubscanError {
  /// The search query was empty or only whitespace.
  #[error("Search query must not be empty")]
  EmptyQuery,

  /// The requested result cap is outside `1..=50`.
  #[error("max results must be between 1 and 50, got {0}")]
  InvalidMaxResults(usize),

  /// A network request failed.
  ///
  /// This can occur when:
  /// - The network is unavailable
  /// - The server is unreachable
  /// - The request times out
  /// - TLS/SSL errors occur
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// The E-utilities service answered with an error.
  ///
  /// Covers non-success HTTP statuses as well as the `ERROR` field that
  /// `esearch` embeds in otherwise successful responses.
  #[error("API error: {0}")]
  ApiError(String),

  /// A response body could not be decoded.
  #[error("Failed to parse response: {0}")]
  Parse(String),

  /// The service returned no article for the requested PMID.
  #[error("No article found for PMID {0}")]
  NotFound(String),

  /// Failed to build a request URL.
  #[error(transparent)]
  InvalidUrl(#[from] url::ParseError),

  /// Writing a CSV record failed.
  #[error(transparent)]
  Csv(#[from] csv::Error),

  /// A file system operation failed.
  ///
  /// This occurs when the output file cannot be created, truncated, or
  /// flushed.
  #[error(transparent)]
  Io(#[from] std::io::Error),
}

