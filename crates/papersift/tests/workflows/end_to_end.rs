use super::*;

const EXPECTED_CSV: &str = "\
PubmedID,Title,Publication Date,Non-academic Author(s),Company Affiliation(s),Corresponding Author Email
39000001,Bispecific antibody & checkpoint blockade in refractory melanoma.,2024-05-14,Jane Doe,Genentech Inc.,jane.doe@gene.com
39000003,Base editing in vivo restores PCSK9-/- phenotypes in primates.,2023-09-07,Ann Miller; Hiro Tanaka,Pfizer Inc.; Takeda Pharmaceutical Co.; Verve Therapeutics,ann.miller@vervetx.com
";

async fn mount_efetch(server: &MockServer) {
  Mock::given(method("GET"))
    .and(path("/entrez/eutils/efetch.fcgi"))
    .and(query_param("id", SAMPLE_IDS.join(",")))
    .and(query_param("retmode", "xml"))
    .respond_with(ResponseTemplate::new(200).set_body_string(EFETCH_SAMPLE))
    .mount(server)
    .await;
}

#[traced_test]
#[tokio::test]
async fn test_query_to_csv() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_esearch(&server, &SAMPLE_IDS).await;
  mount_efetch(&server).await;

  let report = pipeline_for(&server)?.run("melanoma OR PCSK9", 1000).await?;
  assert_eq!(report.identifiers, 4);
  // The broken fourth record is skipped.
  assert_eq!(report.articles, 3);
  assert_eq!(report.rows.len(), 2);

  assert_eq!(ReportWriter::default().render(&report.rows)?, EXPECTED_CSV);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_identical_responses_give_identical_output() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_esearch(&server, &SAMPLE_IDS).await;
  mount_efetch(&server).await;

  let pipeline = pipeline_for(&server)?;
  let writer = ReportWriter::default();
  let first = writer.render(&pipeline.run("melanoma OR PCSK9", 1000).await?.rows)?;
  let second = writer.render(&pipeline.run("melanoma OR PCSK9", 1000).await?.rows)?;
  assert_eq!(first, second);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_batches_follow_identifier_order() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_esearch(&server, &SAMPLE_IDS).await;
  for ids in SAMPLE_IDS.chunks(3) {
    Mock::given(path("/entrez/eutils/efetch.fcgi"))
      .and(query_param("id", ids.join(",")))
      .respond_with(ResponseTemplate::new(200).set_body_string("<PubmedArticleSet/>"))
      .expect(1)
      .mount(&server)
      .await;
  }

  let report = pipeline_for(&server)?.with_batch_size(3).run("anything", 1000).await?;
  assert!(report.is_empty());
  assert_eq!(report.identifiers, 4);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_no_results_skips_fetch() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_esearch(&server, &[]).await;
  Mock::given(path("/entrez/eutils/efetch.fcgi"))
    .respond_with(ResponseTemplate::new(200))
    .expect(0)
    .mount(&server)
    .await;

  let report = pipeline_for(&server)?.run("nothing at all", 1000).await?;
  assert!(report.is_empty());
  assert_eq!(ReportWriter::default().render(&report.rows)?.lines().count(), 1);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_fetch_failure_aborts_run() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_esearch(&server, &SAMPLE_IDS).await;
  Mock::given(path("/entrez/eutils/efetch.fcgi"))
    .respond_with(ResponseTemplate::new(500))
    .mount(&server)
    .await;

  match pipeline_for(&server)?.run("anything", 1000).await {
    Err(SiftError::HttpStatus { endpoint, status }) => {
      assert_eq!(endpoint, "efetch");
      assert_eq!(status.as_u16(), 500);
    },
    other => panic!("expected an HTTP status error, got {other:?}"),
  }
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_unreachable_server_is_a_network_error() -> TestResult<()> {
  let config = EntrezConfig {
    base_url: "http://127.0.0.1:1/entrez/eutils".into(),
    search_timeout_secs: 5,
    ..Default::default()
  };
  let client = EntrezClient::new(config)?;

  assert!(matches!(client.search("anything", 10).await, Err(SiftError::Network(_))));
  Ok(())
}
