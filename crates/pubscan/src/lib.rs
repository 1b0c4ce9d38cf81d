//! A library for scanning PubMed search results for authors with industry
//! (non-academic) affiliations.
//!
//! The crate runs a single linear pipeline:
//! - search PubMed for a free-text query and collect up to 50 PMIDs,
//! - fetch each record's metadata,
//! - classify every author affiliation as academic or company,
//! - write the results to a CSV file.
//!
//! # Example
//! ```rust,no_run
//! use pubscan::{
//!   classify::AffiliationClassifier, clients::PubMedClient, pipeline::Pipeline,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!   let pipeline = Pipeline::new(PubMedClient::new()?, AffiliationClassifier::default());
//!   let summary = pipeline.run("crispr therapeutics", "results.csv").await?;
//!   println!("Wrote {} rows", summary.written);
//!
//!   Ok(())
//! }
//! ```

#![warn(missing_docs, clippy::missing_docs_in_private_items)]
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};
#[cfg(test)] use tracing_test::traced_test;

pub mod classify;
pub mod clients;
pub mod errors;
pub mod extract;
pub mod format;
pub mod output;
pub mod paper;
pub mod pipeline;
#[cfg(test)] mod tests;

use classify::AffiliationClassifier;
use clients::PubMedClient;
use errors::PubscanError;
use extract::OutputRow;
use paper::{Author, PaperRecord};

/// Placeholder written whenever a field cannot be determined.
pub const NOT_AVAILABLE: &str = "Not Available";
