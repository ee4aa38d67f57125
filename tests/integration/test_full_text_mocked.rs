//! Mocked tests for PMC full text retrieval and the OA PDF lookup

use pubmed_gateway::{FullTextStatus, PmcClient, PubMedError};
use tracing_test::traced_test;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::mock_config;

const JATS_ARTICLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE pmc-articleset PUBLIC "-//NLM//DTD ARTICLE SET 2.0//EN" "https://dtd.nlm.nih.gov/ncbi/pmc/articleset/nlm-articleset-2.0.dtd">
<pmc-articleset>
  <article xmlns:xlink="http://www.w3.org/1999/xlink" article-type="research-article">
    <front>
      <article-meta>
        <article-id pub-id-type="pmc">7906746</article-id>
        <title-group><article-title>Front matter title</article-title></title-group>
        <abstract><p>Abstract paragraphs stay out of the body.</p></abstract>
      </article-meta>
    </front>
    <body>
      <sec id="s1">
        <title>Introduction</title>
        <p>Vaccines were rolled out in <italic>December</italic> 2020.</p>
        <p>Effectiveness was unknown.</p>
      </sec>
      <sec id="s2">
        <title>Methods</title>
        <p>We ran a cohort study.</p>
        <sec id="s2a">
          <title>Data sources</title>
          <p>Registry records.</p>
        </sec>
        <sec id="s2b">
          <title>Outcomes</title>
        </sec>
      </sec>
      <sec id="s3">
        <title>Empty</title>
      </sec>
    </body>
    <back><ref-list><ref><mixed-citation>Reference text</mixed-citation></ref></ref-list></back>
  </article>
</pmc-articleset>"#;

const OA_RECORD: &str = r#"<OA><responseDate>2024-01-01 00:00:00</responseDate>
<request id="PMC7906746">https://www.ncbi.nlm.nih.gov/pmc/utils/oa/oa.fcgi?id=PMC7906746</request>
<records returned-count="1" total-count="1">
  <record id="PMC7906746" citation="Sci Rep. 2021" license="CC BY" retracted="no">
    <link format="tgz" updated="2021-03-01 00:00:00" href="ftp://ftp.ncbi.nlm.nih.gov/pub/pmc/oa_package/PMC7906746.tar.gz"/>
    <link format="pdf" updated="2021-03-01 00:00:00" href="ftp://ftp.ncbi.nlm.nih.gov/pub/pmc/oa_pdf/PMC7906746.pdf"/>
  </record>
</records></OA>"#;

fn create_mock_client(mock_server: &MockServer) -> PmcClient {
    PmcClient::with_config(&mock_config(mock_server)).expect("client")
}

async fn mount_efetch(mock_server: &MockServer, body: &str) {
    Mock::given(method("POST"))
        .and(path("/efetch.fcgi"))
        .and(body_string_contains("db=pmc"))
        .and(body_string_contains("id=PMC7906746"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .expect(1)
        .mount(mock_server)
        .await;
}

async fn mount_oa(mock_server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/oa.fcgi"))
        .and(query_param("id", "PMC7906746"))
        .respond_with(response)
        .mount(mock_server)
        .await;
}

#[tokio::test]
#[traced_test]
async fn test_full_text_sections_and_pdf() {
    let mock_server = MockServer::start().await;
    mount_efetch(&mock_server, JATS_ARTICLE).await;
    mount_oa(&mock_server, ResponseTemplate::new(200).set_body_string(OA_RECORD)).await;

    let client = create_mock_client(&mock_server);
    // Bare numeric ids are normalized to the PMC form
    let result = client.fetch_full_text("7906746").await.expect("full text");

    assert_eq!(result.status, FullTextStatus::Success);
    assert_eq!(result.pmcid.as_deref(), Some("PMC7906746"));
    assert!(result.parsing_error.is_none());
    assert_eq!(
        result.pdf_url.as_deref(),
        Some("ftp://ftp.ncbi.nlm.nih.gov/pub/pmc/oa_pdf/PMC7906746.pdf")
    );

    let titles: Vec<&str> = result.sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Introduction", "Methods"]);
    assert_eq!(
        result.sections[0].text,
        "Vaccines were rolled out in December 2020.\n\nEffectiveness was unknown."
    );
    assert_eq!(
        result.sections[1].text,
        "We ran a cohort study.\n\nData sources:\nRegistry records.\n\nOutcomes:"
    );
    assert!(
        result
            .sections
            .iter()
            .all(|s| !s.text.contains("Abstract paragraphs") && !s.text.contains("Reference text"))
    );
}

#[tokio::test]
#[traced_test]
async fn test_missing_body_is_a_parsing_error_not_a_failure() {
    let mock_server = MockServer::start().await;
    mount_efetch(
        &mock_server,
        "<pmc-articleset><article><front><article-meta/></front></article></pmc-articleset>",
    )
    .await;
    mount_oa(&mock_server, ResponseTemplate::new(200).set_body_string(OA_RECORD)).await;

    let client = create_mock_client(&mock_server);
    let result = client.get_full_text("PMC7906746").await;

    assert_eq!(result.status, FullTextStatus::Success);
    assert!(result.sections.is_empty());
    assert_eq!(
        result.parsing_error.as_deref(),
        Some("No body element found in JATS XML")
    );
    assert!(result.pdf_url.is_some());
}

#[tokio::test]
#[traced_test]
async fn test_publisher_restriction_notice() {
    let mock_server = MockServer::start().await;
    mount_efetch(
        &mock_server,
        r#"<pmc-articleset><article><front/><body><p>The publisher of this article does not allow downloading of the full text in XML form.</p></body></article></pmc-articleset>"#,
    )
    .await;
    mount_oa(&mock_server, ResponseTemplate::new(200).set_body_string(
        r#"<OA><error code="idIsNotOpenAccess">identifier 'PMC7906746' is not Open Access</error></OA>"#,
    ))
    .await;

    let client = create_mock_client(&mock_server);
    let result = client.get_full_text("pmc7906746").await;

    assert_eq!(result.status, FullTextStatus::Success);
    assert_eq!(
        result.parsing_error.as_deref(),
        Some("Full text not available due to publisher restrictions")
    );
    assert!(result.pdf_url.is_none());
}

#[tokio::test]
#[traced_test]
async fn test_oa_failure_never_affects_the_result() {
    let mock_server = MockServer::start().await;
    mount_efetch(&mock_server, JATS_ARTICLE).await;
    mount_oa(&mock_server, ResponseTemplate::new(500)).await;

    let client = create_mock_client(&mock_server);
    let result = client.get_full_text("PMC7906746").await;

    assert_eq!(result.status, FullTextStatus::Success);
    assert_eq!(result.sections.len(), 2);
    assert!(result.pdf_url.is_none());
    assert!(result.parsing_error.is_none());
    assert!(result.error.is_none());
}

#[tokio::test]
#[traced_test]
async fn test_unreadable_oa_response_is_swallowed() {
    let mock_server = MockServer::start().await;
    mount_efetch(&mock_server, JATS_ARTICLE).await;
    mount_oa(
        &mock_server,
        ResponseTemplate::new(200).set_body_string("<OA><records><record>"),
    )
    .await;

    let client = create_mock_client(&mock_server);
    let result = client.get_full_text("PMC7906746").await;

    assert!(result.is_success());
    assert!(result.pdf_url.is_none());
    assert_eq!(result.sections.len(), 2);
    assert!(result.error.is_none());
}

#[tokio::test]
#[traced_test]
async fn test_efetch_failure_becomes_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);

    let err = client.fetch_full_text("PMC7906746").await.unwrap_err();
    assert!(matches!(err, PubMedError::ApiError { status: 503, .. }));

    let result = client.get_full_text("PMC7906746").await;
    assert_eq!(result.status, FullTextStatus::Error);
    assert_eq!(result.pmcid.as_deref(), Some("PMC7906746"));
    assert!(result.error.unwrap().contains("503"));

    let serialized = serde_json::to_value(client.get_full_text("PMC7906746").await).unwrap();
    assert_eq!(serialized["status"], "error");
}

#[tokio::test]
#[traced_test]
async fn test_invalid_pmcid_sends_nothing() {
    let mock_server = MockServer::start().await;
    let client = create_mock_client(&mock_server);

    let result = client.get_full_text("PMC-abc").await;

    assert_eq!(result.status, FullTextStatus::Error);
    assert!(result.pmcid.is_none());
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}
