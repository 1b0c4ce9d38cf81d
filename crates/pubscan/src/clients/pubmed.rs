//! Client implementation for NCBI's PubMed E-utilities.
//!
//! Two endpoints are used:
//! - `esearch.fcgi` (JSON) to turn a free-text query into PMIDs
//! - `efetch.fcgi` (XML) to retrieve each record's metadata
//!
//! A failed search is fatal for a run since there is nothing to fetch without
//! it. A failed fetch only loses that one record: [`PubMedClient::fetch_records`]
//! logs the failure and carries on with the remaining identifiers.
//!
//! # Examples
//!
//! ```no_run
//! use pubscan::clients::{ClientConfig, PubMedClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig { max_results: 10, ..ClientConfig::default() };
//! let client = PubMedClient::with_config(config)?;
//!
//! for pmid in client.search("antibody drug conjugate").await? {
//!   let record = client.fetch_record(&pmid).await?;
//!   println!("{}: {}", record.identifier, record.title);
//! }
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use url::Url;

use super::*;

/// Root of NCBI's E-utilities.
pub const EUTILS_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Upper bound on identifiers collected from one search.
pub const MAX_RESULTS: usize = 50;

/// Author name used when PubMed gives neither a personal nor a collective name.
const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Top level `esearch` JSON response.
#[derive(Debug, Deserialize)]
struct ESearchResponse {
  /// The search result payload
  esearchresult: ESearchResult,
}

/// Payload of an `esearch` response.
#[derive(Debug, Deserialize)]
struct ESearchResult {
  /// Total number of matches, as a string
  #[serde(default)]
  count:  Option<String>,
  /// Matching PMIDs in relevance order
  #[serde(default)]
  idlist: Vec<String>,
  /// Set when the query itself was rejected
  #[serde(default, rename = "ERROR")]
  error:  Option<String>,
}

/// Root element of an `efetch` response.
#[derive(Debug, Deserialize)]
#[serde(rename = "PubmedArticleSet")]
struct PubmedArticleSet {
  /// Returned articles, normally exactly one per requested PMID
  #[serde(rename = "PubmedArticle", default)]
  articles: Vec<PubmedArticle>,
}

/// A single `PubmedArticle` element.
#[derive(Debug, Deserialize)]
struct PubmedArticle {
  /// Citation data, which holds everything we read
  #[serde(rename = "MedlineCitation")]
  medline_citation: MedlineCitation,
}

/// The `MedlineCitation` element.
#[derive(Debug, Deserialize)]
struct MedlineCitation {
  /// Article level metadata
  #[serde(rename = "Article")]
  article: Article,
}

/// The `Article` element.
#[derive(Debug, Deserialize)]
struct Article {
  /// Journal details, home of the publication date
  #[serde(rename = "Journal")]
  journal:       Option<Journal>,
  /// Article title, inline markup already stripped
  #[serde(rename = "ArticleTitle")]
  article_title: Option<String>,
  /// Author list, absent for some older records
  #[serde(rename = "AuthorList")]
  author_list:   Option<AuthorList>,
}

/// The `Journal` element.
#[derive(Debug, Deserialize)]
struct Journal {
  /// Issue details
  #[serde(rename = "JournalIssue")]
  journal_issue: Option<JournalIssue>,
}

/// The `JournalIssue` element.
#[derive(Debug, Deserialize)]
struct JournalIssue {
  /// Publication date of the issue
  #[serde(rename = "PubDate")]
  pub_date: Option<PubDate>,
}

/// The `PubDate` element, either structured or a free-text `MedlineDate`.
#[derive(Debug, Deserialize)]
struct PubDate {
  /// Four digit year
  #[serde(rename = "Year")]
  year:         Option<String>,
  /// Month, as a number or English abbreviation
  #[serde(rename = "Month")]
  month:        Option<String>,
  /// Day of month
  #[serde(rename = "Day")]
  day:          Option<String>,
  /// Free-text date used when the structured parts do not apply
  #[serde(rename = "MedlineDate")]
  medline_date: Option<String>,
}

impl PubDate {
  /// Renders the date in `YYYY-Mon-DD` form.
  fn formatted(&self) -> String {
    if self.year.is_none() {
      if let Some(medline_date) = &self.medline_date {
        return format::format_medline_date(medline_date);
      }
    }
    format::format_publication_date(
      self.year.as_deref(),
      self.month.as_deref(),
      self.day.as_deref(),
    )
  }
}

/// The `AuthorList` element.
#[derive(Debug, Deserialize)]
struct AuthorList {
  /// Authors in listed order
  #[serde(rename = "Author", default)]
  authors: Vec<AuthorXml>,
}

/// A single `Author` element.
#[derive(Debug, Deserialize)]
struct AuthorXml {
  /// Family name
  #[serde(rename = "LastName")]
  last_name:        Option<String>,
  /// Given names
  #[serde(rename = "ForeName")]
  fore_name:        Option<String>,
  /// Group name for consortium authors
  #[serde(rename = "CollectiveName")]
  collective_name:  Option<String>,
  /// Zero or more affiliations
  #[serde(rename = "AffiliationInfo", default)]
  affiliation_info: Vec<AffiliationInfo>,
}

impl AuthorXml {
  /// Converts to the common [`Author`] type.
  fn into_author(self) -> Author {
    let non_blank =
      |s: Option<String>| s.map(|s| format::collapse_whitespace(&s)).filter(|s| !s.is_empty());
    let name = match (non_blank(self.fore_name), non_blank(self.last_name)) {
      (Some(fore), Some(last)) => format!("{fore} {last}"),
      (None, Some(last)) => last,
      (Some(fore), None) => fore,
      (None, None) =>
        non_blank(self.collective_name).unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
    };
    let affiliations =
      self.affiliation_info.into_iter().filter_map(|info| info.affiliation).collect();
    Author::new(name, affiliations)
  }
}

/// The `AffiliationInfo` element.
#[derive(Debug, Deserialize)]
struct AffiliationInfo {
  /// Free-text affiliation
  #[serde(rename = "Affiliation")]
  affiliation: Option<String>,
}

/// Parses a raw `efetch` XML body into a [`PaperRecord`].
///
/// The first `PubmedArticle` is used. Fields that are missing are filled with
/// [`NOT_AVAILABLE`] instead of failing the record.
pub fn parse_efetch(pmid: &str, xml: &str) -> Result<PaperRecord, PubscanError> {
  let cleaned = format::strip_inline_tags(xml);
  let set: PubmedArticleSet = from_str(&cleaned)
    .map_err(|e| PubscanError::Parse(format!("Failed to parse XML for PMID {pmid}: {e}")))?;

  let article = set
    .articles
    .into_iter()
    .next()
    .ok_or_else(|| PubscanError::NotFound(pmid.to_string()))?
    .medline_citation
    .article;

  let title = article
    .article_title
    .map(|t| format::collapse_whitespace(&t))
    .filter(|t| !t.is_empty())
    .unwrap_or_else(|| NOT_AVAILABLE.to_string());

  let publication_date = article
    .journal
    .and_then(|j| j.journal_issue)
    .and_then(|ji| ji.pub_date)
    .map_or_else(|| NOT_AVAILABLE.to_string(), |pd| pd.formatted());

  let authors: Vec<Author> = article
    .author_list
    .map(|list| list.authors.into_iter().map(AuthorXml::into_author).collect())
    .unwrap_or_default();

  debug!(pmid, authors = authors.len(), "Parsed efetch record");

  Ok(PaperRecord { identifier: pmid.to_string(), title, publication_date, authors })
}

/// Settings for a [`PubMedClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
  /// E-utilities root, without the endpoint name
  pub base_url:    String,
  /// NCBI API key, raises the allowed request rate when set
  pub api_key:     Option<String>,
  /// Tool name reported to NCBI
  pub tool:        String,
  /// Contact address reported to NCBI
  pub email:       Option<String>,
  /// Number of identifiers to request from a search, at most [`MAX_RESULTS`]
  pub max_results: usize,
  /// Per-request timeout
  pub timeout:     Duration,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      base_url:    EUTILS_BASE_URL.to_string(),
      api_key:     None,
      tool:        "pubscan".to_string(),
      email:       None,
      max_results: MAX_RESULTS,
      timeout:     Duration::from_secs(30),
    }
  }
}

/// Outcome of fetching a batch of identifiers.
#[derive(Debug, Default)]
pub struct Fetched {
  /// Successfully parsed records, in request order
  pub records: Vec<PaperRecord>,
  /// Identifiers that could not be fetched or parsed
  pub skipped: Vec<String>,
}

/// Client for the PubMed E-utilities.
///
/// Requests are issued one at a time, each awaited before the next is sent.
pub struct PubMedClient {
  /// Internal web client used to connect to the API.
  client: reqwest::Client,
  /// Endpoint and identification settings.
  config: ClientConfig,
}

impl PubMedClient {
  /// Creates a client with the default configuration.
  ///
  /// # Errors
  ///
  /// Returns [`PubscanError::Network`] if the HTTP client cannot be built.
  pub fn new() -> Result<Self, PubscanError> { Self::with_config(ClientConfig::default()) }

  /// Creates a client from an explicit configuration.
  ///
  /// # Errors
  ///
  /// Returns [`PubscanError::InvalidMaxResults`] if `max_results` is zero or
  /// above [`MAX_RESULTS`], [`PubscanError::InvalidUrl`] if `base_url`
  /// does not parse, and [`PubscanError::Network`] if the HTTP client cannot
  /// be built.
  pub fn with_config(config: ClientConfig) -> Result<Self, PubscanError> {
    if config.max_results == 0 || config.max_results > MAX_RESULTS {
      return Err(PubscanError::InvalidMaxResults(config.max_results));
    }
    Url::parse(&config.base_url)?;
    let client = http_client(&config)?;
    Ok(Self { client, config })
  }

  /// The configuration this client was built with.
  pub fn config(&self) -> &ClientConfig { &self.config }

  /// Builds an endpoint URL carrying the shared NCBI identification parameters.
  fn endpoint(&self, name: &str, params: &[(&str, &str)]) -> Result<Url, PubscanError> {
    let mut url = Url::parse(&format!("{}/{}", self.config.base_url.trim_end_matches('/'), name))?;
    {
      let mut pairs = url.query_pairs_mut();
      pairs.extend_pairs(params);
      pairs.append_pair("tool", &self.config.tool);
      if let Some(email) = &self.config.email {
        pairs.append_pair("email", email);
      }
      if let Some(api_key) = &self.config.api_key {
        pairs.append_pair("api_key", api_key);
      }
    }
    Ok(url)
  }

  /// Sends a GET request and returns the body of a successful response.
  async fn get_text(&self, url: Url) -> Result<String, PubscanError> {
    let response = self.client.get(url).send().await?;
    let status = response.status();
    debug!("Response status: {status}");
    if !status.is_success() {
      return Err(PubscanError::ApiError(format!("HTTP {status}")));
    }
    let text = response.text().await?;
    trace!("Response body: {text}");
    Ok(text)
  }

  /// Searches PubMed and returns up to `max_results` PMIDs in relevance order.
  ///
  /// # Errors
  ///
  /// Every error here is fatal to a run:
  /// - [`PubscanError::EmptyQuery`] for a blank query
  /// - [`PubscanError::Network`] for transport failures and timeouts
  /// - [`PubscanError::ApiError`] for non-success statuses or a rejected query
  /// - [`PubscanError::Parse`] for an unreadable response
  pub async fn search(&self, query: &str) -> Result<Vec<String>, PubscanError> {
    let query = query.trim();
    if query.is_empty() {
      return Err(PubscanError::EmptyQuery);
    }

    let retmax = self.config.max_results.to_string();
    let url = self.endpoint("esearch.fcgi", &[
      ("db", "pubmed"),
      ("term", query),
      ("retmode", "json"),
      ("retmax", retmax.as_str()),
    ])?;
    debug!("Searching PubMed via: {url}");

    let text = self.get_text(url).await.map_err(|e| match e {
      PubscanError::ApiError(msg) => PubscanError::ApiError(format!("esearch failed: {msg}")),
      other => other,
    })?;
    let response: ESearchResponse = serde_json::from_str(&text)
      .map_err(|e| PubscanError::Parse(format!("Failed to parse esearch JSON: {e}")))?;
    let result = response.esearchresult;

    if let Some(error) = result.error {
      return Err(PubscanError::ApiError(format!("esearch rejected query: {error}")));
    }

    let mut ids = result.idlist;
    ids.truncate(self.config.max_results);
    info!(
      total = result.count.as_deref().unwrap_or("unknown"),
      returned = ids.len(),
      "Search complete"
    );
    Ok(ids)
  }

  /// Fetches and parses a single record.
  ///
  /// # Errors
  ///
  /// Returns an error if the request fails, the service answers with a
  /// non-success status, the XML cannot be parsed, or it contains no article.
  pub async fn fetch_record(&self, pmid: &str) -> Result<PaperRecord, PubscanError> {
    let url = self.endpoint("efetch.fcgi", &[("db", "pubmed"), ("id", pmid), ("retmode", "xml")])?;
    debug!("Fetching record via: {url}");

    let text = self.get_text(url).await?;
    parse_efetch(pmid, &text)
  }

  /// Fetches every identifier in order, skipping the ones that fail.
  pub async fn fetch_records(&self, ids: &[String]) -> Fetched {
    let mut fetched = Fetched::default();
    for pmid in ids {
      match self.fetch_record(pmid).await {
        Ok(record) => fetched.records.push(record),
        Err(e) => {
          warn!(pmid = %pmid, error = %e, "Skipping record that could not be fetched");
          fetched.skipped.push(pmid.clone());
        },
      }
    }
    fetched
  }
}

/// Builds the underlying HTTP client, identifying ourselves to NCBI.
fn http_client(config: &ClientConfig) -> Result<reqwest::Client, PubscanError> {
  let client = reqwest::Client::builder()
    .user_agent(concat!("pubscan/", env!("CARGO_PKG_VERSION")))
    .timeout(config.timeout)
    .build()?;
  Ok(client)
}
