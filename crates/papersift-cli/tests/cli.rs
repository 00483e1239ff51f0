//! Integration tests for the `get-papers-list` binary.
//!
//! Every test points the binary at a local mock of the E-utilities endpoints through a
//! temporary configuration file. Tests run serially so their output does not interleave.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::{tempdir, TempDir};
use wiremock::{
  matchers::{method, path, query_param},
  Mock, MockServer, ResponseTemplate,
};

const INDUSTRY_RECORD: &str = "<PubmedArticle><MedlineCitation><PMID>1</PMID><Article>\
  <ArticleTitle>Anti-TNF therapy outcomes</ArticleTitle>\
  <AuthorList><Author><LastName>Doe</LastName><ForeName>Jane</ForeName>\
  <AffiliationInfo><Affiliation>Acme Pharma Inc, Boston. jane@acme.com</Affiliation></AffiliationInfo>\
  </Author></AuthorList>\
  <ArticleDate><Year>2024</Year><Month>03</Month><Day>02</Day></ArticleDate>\
  </Article></MedlineCitation></PubmedArticle>";

const ACADEMIC_RECORD: &str = "<PubmedArticle><MedlineCitation><PMID>2</PMID><Article>\
  <ArticleTitle>Field notes</ArticleTitle>\
  <AuthorList><Author><LastName>Roe</LastName><ForeName>John</ForeName>\
  <AffiliationInfo><Affiliation>State University Dept of Biology</Affiliation></AffiliationInfo>\
  </Author></AuthorList>\
  </Article></MedlineCitation></PubmedArticle>";

const EXPECTED_CSV: &str = "\
PubmedID,Title,Publication Date,Non-academic Author(s),Company Affiliation(s),Corresponding Author Email
1,Anti-TNF therapy outcomes,2024-03-02,Jane Doe,Acme Pharma Inc,jane@acme.com
";

// Helper function to create a clean command instance
fn get_papers_list() -> Command { Command::cargo_bin("get-papers-list").unwrap() }

/// Writes a configuration file pointing at the mock server.
fn config_for(server: &MockServer) -> (TempDir, PathBuf) {
  let dir = tempdir().unwrap();
  let path = dir.path().join("config.toml");
  std::fs::write(
    &path,
    format!("[entrez]\nbase_url = \"{}/entrez/eutils\"\nemail = \"ci@example.org\"\n", server.uri()),
  )
  .unwrap();
  (dir, path)
}

async fn mount_esearch(server: &MockServer, ids: &[&str]) {
  let idlist = ids.iter().map(|id| format!("\"{id}\"")).collect::<Vec<_>>().join(",");
  Mock::given(method("GET"))
    .and(path("/entrez/eutils/esearch.fcgi"))
    .respond_with(ResponseTemplate::new(200).set_body_string(format!(
      r#"{{"esearchresult":{{"count":"{}","idlist":[{idlist}]}}}}"#,
      ids.len()
    )))
    .mount(server)
    .await;
}

async fn mount_efetch(server: &MockServer, records: &[&str]) {
  Mock::given(method("GET"))
    .and(path("/entrez/eutils/efetch.fcgi"))
    .respond_with(
      ResponseTemplate::new(200)
        .set_body_string(format!("<PubmedArticleSet>{}</PubmedArticleSet>", records.concat())),
    )
    .mount(server)
    .await;
}

#[test]
#[serial]
fn test_help() {
  get_papers_list()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("--file"))
    .stdout(predicate::str::contains("--limit"))
    .stdout(predicate::str::contains("--debug"));
}

#[test]
#[serial]
fn test_query_is_required() { get_papers_list().assert().failure(); }

#[tokio::test(flavor = "multi_thread")]
#[serial]
async fn test_prints_csv_to_stdout() {
  let server = MockServer::start().await;
  mount_esearch(&server, &["1", "2"]).await;
  mount_efetch(&server, &[INDUSTRY_RECORD, ACADEMIC_RECORD]).await;
  let (_dir, config) = config_for(&server);

  get_papers_list()
    .arg("anti-TNF")
    .arg("--config")
    .arg(&config)
    .assert()
    .success()
    .stdout(EXPECTED_CSV)
    .stderr(predicate::str::contains("ℹ Query: anti-TNF"));
}

#[tokio::test(flavor = "multi_thread")]
#[serial]
async fn test_limit_is_sent_as_retmax() {
  let server = MockServer::start().await;
  Mock::given(path("/entrez/eutils/esearch.fcgi"))
    .and(query_param("retmax", "5"))
    .and(query_param("email", "ci@example.org"))
    .respond_with(
      ResponseTemplate::new(200).set_body_string(r#"{"esearchresult":{"idlist":["1"]}}"#),
    )
    .expect(1)
    .mount(&server)
    .await;
  mount_efetch(&server, &[INDUSTRY_RECORD]).await;
  let (_dir, config) = config_for(&server);

  get_papers_list()
    .args(["anti-TNF", "-l", "5", "-c"])
    .arg(&config)
    .assert()
    .success()
    .stdout(EXPECTED_CSV);
}

#[tokio::test(flavor = "multi_thread")]
#[serial]
async fn test_writes_file() {
  let server = MockServer::start().await;
  mount_esearch(&server, &["1", "2"]).await;
  mount_efetch(&server, &[INDUSTRY_RECORD, ACADEMIC_RECORD]).await;
  let (dir, config) = config_for(&server);
  let output = dir.path().join("papers.csv");

  get_papers_list()
    .arg("anti-TNF")
    .arg("--config")
    .arg(&config)
    .arg("--file")
    .arg(&output)
    .assert()
    .success()
    .stdout(predicate::str::contains("Saved 1 rows to"));

  assert_eq!(std::fs::read_to_string(&output).unwrap(), EXPECTED_CSV);
}

#[tokio::test(flavor = "multi_thread")]
#[serial]
async fn test_tab_delimiter() {
  let server = MockServer::start().await;
  mount_esearch(&server, &["1"]).await;
  mount_efetch(&server, &[INDUSTRY_RECORD]).await;
  let (_dir, config) = config_for(&server);

  get_papers_list()
    .arg("anti-TNF")
    .arg("--config")
    .arg(&config)
    .args(["--delimiter", "\t"])
    .assert()
    .success()
    .stdout(predicate::str::contains(
      "1\tAnti-TNF therapy outcomes\t2024-03-02\tJane Doe\tAcme Pharma Inc\tjane@acme.com",
    ));
}

#[tokio::test(flavor = "multi_thread")]
#[serial]
async fn test_no_matching_papers() {
  let server = MockServer::start().await;
  mount_esearch(&server, &[]).await;
  let (_dir, config) = config_for(&server);

  get_papers_list()
    .arg("nothing matches")
    .arg("--config")
    .arg(&config)
    .assert()
    .success()
    .stdout(predicate::str::contains("⚠ No matching papers found."));
}

#[tokio::test(flavor = "multi_thread")]
#[serial]
async fn test_academic_only_results() {
  let server = MockServer::start().await;
  mount_esearch(&server, &["2"]).await;
  mount_efetch(&server, &[ACADEMIC_RECORD]).await;
  let (_dir, config) = config_for(&server);

  get_papers_list()
    .arg("field notes")
    .arg("--config")
    .arg(&config)
    .assert()
    .success()
    .stdout(predicate::str::contains("No matching papers found."));
}

#[tokio::test(flavor = "multi_thread")]
#[serial]
async fn test_server_error_exits_with_status_one() {
  let server = MockServer::start().await;
  mount_esearch(&server, &["1"]).await;
  Mock::given(path("/entrez/eutils/efetch.fcgi"))
    .respond_with(ResponseTemplate::new(500))
    .mount(&server)
    .await;
  let (_dir, config) = config_for(&server);

  get_papers_list()
    .arg("anti-TNF")
    .arg("--config")
    .arg(&config)
    .assert()
    .code(1)
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("✗ Error: "))
    .stderr(predicate::str::contains("500"));
}

#[tokio::test(flavor = "multi_thread")]
#[serial]
async fn test_rejects_oversized_batch() {
  let server = MockServer::start().await;
  let (_dir, config) = config_for(&server);

  get_papers_list()
    .arg("anti-TNF")
    .arg("--config")
    .arg(&config)
    .args(["--batch-size", "301"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("batch_size"));
}

#[tokio::test(flavor = "multi_thread")]
#[serial]
async fn test_repeated_runs_are_identical() {
  let server = MockServer::start().await;
  mount_esearch(&server, &["1", "2"]).await;
  mount_efetch(&server, &[INDUSTRY_RECORD, ACADEMIC_RECORD]).await;
  let (_dir, config) = config_for(&server);

  let run = || get_papers_list().arg("anti-TNF").arg("--config").arg(&config).output().unwrap();
  let first = run();
  let second = run();
  assert!(first.status.success());
  assert_eq!(first.stdout, second.stdout);
}
