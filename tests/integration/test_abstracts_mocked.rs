//! Mocked tests for batch EFetch abstracts

use pubmed_gateway::{PubMedClient, PubMedError};
use tracing_test::traced_test;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{mock_config, pubmed_article_set, pubmed_article_xml};

fn create_mock_client(mock_server: &MockServer) -> PubMedClient {
    PubMedClient::with_config(&mock_config(mock_server)).expect("client")
}

#[tokio::test]
#[traced_test]
async fn test_fetch_abstracts_batch() {
    let mock_server = MockServer::start().await;

    let xml = pubmed_article_set(&[
        pubmed_article_xml("31978945", "A Novel Coronavirus from Patients with Pneumonia in China, 2019.", &[]),
        pubmed_article_xml("33515491", "Second article", &[]),
    ]);

    Mock::given(method("POST"))
        .and(path("/efetch.fcgi"))
        .and(body_string_contains("db=pubmed"))
        .and(body_string_contains("id=31978945%2C33515491"))
        .and(body_string_contains("rettype=abstract"))
        .and(body_string_contains("retmode=xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(xml)
                .insert_header("content-type", "text/xml"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let abstracts = client
        .fetch_abstracts(&["31978945", "33515491"])
        .await
        .expect("fetch succeeds");

    assert_eq!(abstracts.len(), 2);

    let first = &abstracts[0];
    assert_eq!(first.pmid, "31978945");
    assert_eq!(
        first.title,
        "A Novel Coronavirus from Patients with Pneumonia in China, 2019."
    );
    assert_eq!(
        first.abstract_text,
        "BACKGROUND: Background text.\nMETHODS: Methods text."
    );
    assert_eq!(first.journal, "The New England journal of medicine");
    assert_eq!(first.year, "2020");
    // The collective author has no fore/last name and is skipped
    assert_eq!(first.authors, vec!["Na Zhu", "Wenling Wang"]);
    assert_eq!(first.doi.as_deref(), Some("10.1056/NEJMoa31978945"));

    assert_eq!(abstracts[1].pmid, "33515491");
}

#[tokio::test]
#[traced_test]
async fn test_duplicate_ids_are_sent_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/efetch.fcgi"))
        .and(body_string_contains("id=31978945%2C33515491&"))
        .respond_with(ResponseTemplate::new(200).set_body_string(pubmed_article_set(&[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let abstracts = client
        .fetch_abstracts(&["31978945", " 33515491 ", "31978945"])
        .await
        .expect("fetch succeeds");

    assert!(abstracts.is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_malformed_xml_is_an_xml_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/efetch.fcgi"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<PubmedArticleSet><PubmedArticle><MedlineCitation>"),
        )
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let err = client.fetch_abstracts(&["31978945"]).await.unwrap_err();

    assert!(matches!(err, PubMedError::XmlError(_)));
}

#[tokio::test]
#[traced_test]
async fn test_fetch_abstract_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(pubmed_article_set(&[])))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let err = client.fetch_abstract("99999999").await.unwrap_err();

    match err {
        PubMedError::ArticleNotFound { pmid } => assert_eq!(pmid, "99999999"),
        other => panic!("expected ArticleNotFound, got {other:?}"),
    }
}

#[tokio::test]
#[traced_test]
async fn test_invalid_pmid_sends_nothing() {
    let mock_server = MockServer::start().await;
    let client = create_mock_client(&mock_server);

    let err = client.fetch_abstracts(&["31978945", "PMC123"]).await.unwrap_err();

    assert!(matches!(err, PubMedError::InvalidPmid { .. }));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_efetch_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let err = client.fetch_abstracts(&["31978945"]).await.unwrap_err();

    assert!(matches!(err, PubMedError::ApiError { status: 502, .. }));
}
