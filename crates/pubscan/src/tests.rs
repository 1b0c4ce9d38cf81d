use tempfile::tempdir;
use wiremock::{
  matchers::{method, path, query_param},
  Mock, MockServer, ResponseTemplate,
};

use super::*;
use crate::{clients::ClientConfig, pipeline::Pipeline};

/// Builds an `esearch` JSON body returning `ids`.
pub(crate) fn esearch_json(ids: &[&str]) -> String {
  let idlist = ids.iter().map(|id| format!("\"{id}\"")).collect::<Vec<_>>().join(",");
  format!(
    r#"{{"header":{{"type":"esearch","version":"0.3"}},"esearchresult":{{"count":"{}","retmax":"{}","retstart":"0","idlist":[{idlist}]}}}}"#,
    ids.len(),
    ids.len()
  )
}

/// Builds a minimal `efetch` XML body for one article.
pub(crate) fn efetch_xml(pmid: &str, title: &str, pub_date: &str, authors: &str) -> String {
  format!(
    r#"<?xml version="1.0" ?>
<!DOCTYPE PubmedArticleSet PUBLIC "-//NLM//DTD PubMedArticle, 1st January 2024//EN" "https://dtd.nlm.nih.gov/ncbi/pubmed/out/pubmed_240101.dtd">
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation Status="MEDLINE" Owner="NLM">
      <PMID Version="1">{pmid}</PMID>
      <Article PubModel="Print-Electronic">
        <Journal>
          <JournalIssue CitedMedium="Internet">
            <PubDate>{pub_date}</PubDate>
          </JournalIssue>
          <Title>Journal of Examples</Title>
        </Journal>
        <ArticleTitle>{title}</ArticleTitle>
        <AuthorList CompleteYN="Y">{authors}</AuthorList>
        <Language>eng</Language>
      </Article>
    </MedlineCitation>
    <PubmedData>
      <ArticleIdList>
        <ArticleId IdType="pubmed">{pmid}</ArticleId>
      </ArticleIdList>
    </PubmedData>
  </PubmedArticle>
</PubmedArticleSet>"#
  )
}

/// One author element with a single affiliation.
fn author(fore: &str, last: &str, affiliation: &str) -> String {
  format!(
    "<Author ValidYN=\"Y\"><LastName>{last}</LastName><ForeName>{fore}</ForeName>\
     <AffiliationInfo><Affiliation>{affiliation}</Affiliation></AffiliationInfo></Author>"
  )
}

/// Mounts a search answer plus one efetch answer per `(pmid, body)` pair.
async fn mock_upstream(server: &MockServer, ids: &[&str], records: &[(&str, String)]) {
  Mock::given(method("GET"))
    .and(path("/esearch.fcgi"))
    .respond_with(ResponseTemplate::new(200).set_body_string(esearch_json(ids)))
    .mount(server)
    .await;
  for (pmid, body) in records {
    Mock::given(method("GET"))
      .and(path("/efetch.fcgi"))
      .and(query_param("id", *pmid))
      .respond_with(ResponseTemplate::new(200).set_body_string(body.clone()))
      .mount(server)
      .await;
  }
}

fn pipeline_for(server: &MockServer) -> Pipeline {
  let client =
    PubMedClient::with_config(ClientConfig { base_url: server.uri(), ..ClientConfig::default() })
      .unwrap();
  Pipeline::new(client, AffiliationClassifier::default())
}

#[traced_test]
#[tokio::test]
async fn test_pipeline_writes_one_row_per_fetched_record() -> anyhow::Result<()> {
  let server = MockServer::start().await;
  let first = efetch_xml(
    "101",
    "Industry and academia",
    "<Year>2022</Year><Month>11</Month><Day>3</Day>",
    &[
      author("Ann", "Lee", "Dept. of Biology, State University"),
      author("Bo", "Chen", "XYZ Biotech, contact: a.b@xyz.com"),
      author("Cy", "Diaz", "XYZ Biotech, contact: a.b@xyz.com"),
    ]
    .concat(),
  );
  let third = efetch_xml("103", "Only academics", "<Year>2020</Year>", &author(
    "Di",
    "Ng",
    "Institute of Science",
  ));
  // 102 has no efetch mock, so wiremock answers 404 and the record is skipped.
  mock_upstream(&server, &["101", "102", "103"], &[("101", first), ("103", third)]).await;

  let dir = tempdir()?;
  let out = dir.path().join("results.csv");
  let summary = pipeline_for(&server).run("biotech", &out).await?;

  assert_eq!(summary.requested, 3);
  assert_eq!(summary.written, 2);
  assert_eq!(summary.skipped, ["102"]);

  let text = std::fs::read_to_string(&out)?;
  let lines: Vec<&str> = text.lines().collect();
  assert_eq!(lines, [
    "PubmedID,Title,Publication Date,Non-Academic Authors,Company Affiliations,Corresponding \
     Author Email",
    "101,Industry and academia,2022-Nov-03,\"Bo Chen, Cy Diaz\",\"XYZ Biotech, contact: \
     a.b@xyz.com\",a.b@xyz.com",
    "103,Only academics,2020,,,Not Available",
  ]);
  Ok(())
}

#[tokio::test]
async fn test_pipeline_empty_search_writes_header_only() -> anyhow::Result<()> {
  let server = MockServer::start().await;
  mock_upstream(&server, &[], &[]).await;

  let dir = tempdir()?;
  let out = dir.path().join("empty.csv");
  let summary = pipeline_for(&server).run("nothing matches", &out).await?;

  assert_eq!(summary.written, 0);
  assert_eq!(std::fs::read_to_string(&out)?.lines().count(), 1);
  Ok(())
}

#[tokio::test]
async fn test_pipeline_is_idempotent() -> anyhow::Result<()> {
  let server = MockServer::start().await;
  let body = efetch_xml("7", "Repeatable", "<Year>2024</Year><Month>Feb</Month>", &author(
    "Ed",
    "Park",
    "Omega Corp, Seoul",
  ));
  mock_upstream(&server, &["7"], &[("7", body)]).await;

  let dir = tempdir()?;
  let (a, b) = (dir.path().join("a.csv"), dir.path().join("b.csv"));
  let pipeline = pipeline_for(&server);
  pipeline.run("repeat", &a).await?;
  pipeline.run("repeat", &b).await?;

  assert_eq!(std::fs::read(&a)?, std::fs::read(&b)?);
  Ok(())
}

#[tokio::test]
async fn test_pipeline_search_failure_writes_nothing() -> anyhow::Result<()> {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/esearch.fcgi"))
    .respond_with(ResponseTemplate::new(503))
    .mount(&server)
    .await;

  let dir = tempdir()?;
  let out = dir.path().join("never.csv");
  let result = pipeline_for(&server).run("kras", &out).await;

  assert!(matches!(result, Err(errors::PubscanError::ApiError(_))));
  assert!(!out.exists());
  Ok(())
}

#[tokio::test]
async fn test_collect_preserves_search_order() -> anyhow::Result<()> {
  let server = MockServer::start().await;
  let records: Vec<(&str, String)> = ["30", "10", "20"]
    .into_iter()
    .map(|id| (id, efetch_xml(id, &format!("Paper {id}"), "<Year>2021</Year>", "")))
    .collect();
  mock_upstream(&server, &["30", "10", "20"], &records).await;

  let collected = pipeline_for(&server).collect("order").await?;
  let ids: Vec<&str> = collected.rows.iter().map(|r| r.pubmed_id.as_str()).collect();
  assert_eq!(ids, ["30", "10", "20"]);
  assert!(collected.skipped.is_empty());
  Ok(())
}

#[tokio::test]
async fn test_collect_then_write_matches_run() -> anyhow::Result<()> {
  let server = MockServer::start().await;
  let body = efetch_xml("8", "Split run", "<Year>2023</Year>", &author(
    "Fay",
    "Ito",
    "Gamma Therapeutics GmbH",
  ));
  mock_upstream(&server, &["8", "9"], &[("8", body)]).await;

  let dir = tempdir()?;
  let (whole, split) = (dir.path().join("whole.csv"), dir.path().join("split.csv"));
  let pipeline = pipeline_for(&server);
  let from_run = pipeline.run("split", &whole).await?;

  let collected = pipeline.collect("split").await?;
  assert_eq!(collected.rows[0].company_affiliations, "Gamma Therapeutics GmbH");
  let from_parts = collected.write_csv(&split)?;

  assert_eq!(from_run, from_parts);
  assert_eq!(from_parts.skipped, ["9"]);
  assert_eq!(std::fs::read(&whole)?, std::fs::read(&split)?);
  Ok(())
}

#[tokio::test]
async fn test_pipeline_unreachable_service_writes_nothing() -> anyhow::Result<()> {
  let client = PubMedClient::with_config(ClientConfig {
    base_url: "http://127.0.0.1:1".into(),
    ..ClientConfig::default()
  })?;
  let dir = tempdir()?;
  let out = dir.path().join("never.csv");

  let result = Pipeline::new(client, AffiliationClassifier::default()).run("kras", &out).await;
  assert!(matches!(result, Err(errors::PubscanError::Network(_))));
  assert!(!out.exists());
  Ok(())
}
