//! Client implementations for the remote literature database.
//!
//! Only NCBI's E-utilities are supported. The [`pubmed`] module covers:
//! - Running a search and collecting record identifiers
//! - Fetching each record's XML
//! - Converting the XML into the common [`PaperRecord`] format
//!
//! # Examples
//!
//! ```no_run
//! use pubscan::clients::PubMedClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = PubMedClient::new()?;
//! let ids = client.search("cancer immunotherapy").await?;
//! let fetched = client.fetch_records(&ids).await;
//! println!("Fetched {} of {} records", fetched.records.len(), ids.len());
//! # Ok(())
//! # }
//! ```

use quick_xml::de::from_str;

pub mod pubmed;

pub use pubmed::{ClientConfig, Fetched, PubMedClient};

use super::*;
