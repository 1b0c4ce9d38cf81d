use std::path::{Path, PathBuf};

use clap::{builder::ArgAction, Parser};
use console::{style, Emoji, Term};
use errors::PubscanCliError;
use pubscan::{
  classify::{AffiliationClassifier, ClassifierConfig},
  clients::{
    pubmed::{EUTILS_BASE_URL, MAX_RESULTS},
    ClientConfig, PubMedClient,
  },
  output::DEFAULT_OUTPUT_FILE,
  pipeline::{Pipeline, RunSummary},
};
use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

pub mod errors;

static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
static FACTORY: Emoji<'_, '_> = Emoji("🏭 ", "");
static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "");
static SUCCESS: Emoji<'_, '_> = Emoji("✨ ", "");

#[derive(Parser)]
#[command(
  author,
  version,
  about = "Find PubMed papers with industry-affiliated authors and save them as CSV"
)]
struct Cli {
  /// PubMed search query
  query: String,

  /// Where to write the CSV results (overwritten if it exists)
  #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
  file: PathBuf,

  /// Print debug information while running
  #[arg(short, long)]
  debug: bool,

  /// Verbose mode (-v, -vv, -vvv)
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Number of search results to process (1-50)
  #[arg(long, default_value_t = MAX_RESULTS)]
  max_results: usize,

  /// Extra keyword marking an affiliation as academic (repeatable)
  #[arg(long = "academic-marker", value_name = "MARKER")]
  academic_markers: Vec<String>,

  /// NCBI API key
  #[arg(long, env = "NCBI_API_KEY", hide_env_values = true)]
  api_key: Option<String>,

  /// Contact email reported to NCBI
  #[arg(long, env = "NCBI_EMAIL")]
  email: Option<String>,

  /// E-utilities root URL
  #[arg(long, hide = true, default_value = EUTILS_BASE_URL)]
  base_url: String,
}

/// Setup logging with the specified verbosity level
fn setup_logging(verbosity: u8, debug: bool) {
  let verbosity = if debug { verbosity.max(2) } else { verbosity };
  let filter = match verbosity {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_target(true)
    .init();
}

/// Prints the end-of-run report.
fn report(term: &Term, summary: &RunSummary, file: &Path) -> Result<(), PubscanCliError> {
  if summary.requested == 0 {
    term.write_line(&format!("{} No papers matched the query", style(WARNING).yellow()))?;
  } else {
    term.write_line(&format!(
      "{} Processed {} of {} papers",
      style(SUCCESS).green(),
      style(summary.written).yellow(),
      style(summary.requested).yellow()
    ))?;
  }

  if !summary.skipped.is_empty() {
    term.write_line(&format!(
      "{} Skipped {} records that could not be fetched: {}",
      style(WARNING).yellow(),
      style(summary.skipped.len()).yellow(),
      style(summary.skipped.join(", ")).dim()
    ))?;
  }

  term.write_line(&format!(
    "{} Results saved to {}",
    style(SAVE).green(),
    style(file.display()).yellow()
  ))?;
  Ok(())
}

async fn run(cli: Cli, term: &Term) -> Result<(), PubscanCliError> {
  let config = ClientConfig {
    base_url: cli.base_url,
    api_key: cli.api_key,
    email: cli.email,
    max_results: cli.max_results,
    ..ClientConfig::default()
  };
  let client = PubMedClient::with_config(config)?;

  let classifier_config = cli
    .academic_markers
    .into_iter()
    .fold(ClassifierConfig::default(), |config, marker| config.with_marker(marker));
  let classifier = AffiliationClassifier::new(classifier_config);
  trace!("Academic markers: {:?}", classifier.markers());

  term.write_line(&format!(
    "{} Searching PubMed for: {}",
    style(LOOKING_GLASS).cyan(),
    style(&cli.query).yellow()
  ))?;

  let pipeline = Pipeline::new(client, classifier);
  let collected = pipeline.collect(&cli.query).await?;

  for row in collected.rows.iter().filter(|row| !row.company_affiliations.is_empty()) {
    debug!("Industry row: {:?}", row);
    term.write_line(&format!(
      "{} {} {}",
      style(FACTORY).cyan(),
      style(&row.pubmed_id).yellow(),
      style(&row.title).white()
    ))?;
    term.write_line(&format!(
      "   {} {}",
      style("Companies:").green().bold(),
      style(&row.company_affiliations).white()
    ))?;
  }

  let summary = collected.write_csv(&cli.file)?;
  report(term, &summary, &cli.file)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), PubscanCliError> {
  let cli = Cli::parse();
  setup_logging(cli.verbose, cli.debug);

  let term = Term::stdout();
  run(cli, &term).await
}
