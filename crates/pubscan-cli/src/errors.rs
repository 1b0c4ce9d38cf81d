//! Error types for the pubscan CLI application.
//!
//! The errors are transparent so the underlying message reaches the user
//! unchanged. `main` returns them, so a run that ends in one of these prints
//! `Error: <message>` and exits with a non-zero status.

use std::fmt;

use thiserror::Error;

/// Errors that can occur during a CLI run.
#[derive(Error)]
pub enum PubscanCliError {
  /// Errors from the underlying pubscan library
  #[error(transparent)]
  Pubscan(#[from] pubscan::errors::PubscanError),

  /// File system and IO operation errors
  #[error(transparent)]
  IO(#[from] std::io::Error),
}

// `main` reports errors through `Debug`, so show the readable message there.
impl fmt::Debug for PubscanCliError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{self}") }
}
