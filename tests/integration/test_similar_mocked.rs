//! Mocked tests for similarity search

use pubmed_gateway::PubMedClient;
use tracing_test::traced_test;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{
    esearch_json, esummary_json, esummary_record, mock_config, pubmed_article_set,
    pubmed_article_xml,
};

const SEED_PMID: &str = "31978945";

fn create_mock_client(mock_server: &MockServer) -> PubMedClient {
    PubMedClient::with_config(&mock_config(mock_server)).expect("client")
}

async fn mount_seed(mock_server: &MockServer, title: &str, mesh: &[&str]) {
    Mock::given(method("POST"))
        .and(path("/efetch.fcgi"))
        .and(body_string_contains(format!("id={SEED_PMID}")))
        .respond_with(ResponseTemplate::new(200).set_body_string(pubmed_article_set(&[
            pubmed_article_xml(SEED_PMID, title, mesh),
        ])))
        .expect(1)
        .mount(mock_server)
        .await;
}

#[tokio::test]
#[traced_test]
async fn test_similar_articles_query_and_results() {
    let mock_server = MockServer::start().await;

    mount_seed(
        &mock_server,
        "A Novel Coronavirus from Patients with Pneumonia in China, 2019.",
        &["Betacoronavirus", "Coronavirus Infections", "Pneumonia, Viral", "Humans"],
    )
    .await;

    let expected_query = "(\"Betacoronavirus\"[MeSH Terms] OR \"Coronavirus Infections\"[MeSH Terms] \
                          OR \"Pneumonia, Viral\"[MeSH Terms] OR \"novel\"[Title/Abstract] \
                          OR \"coronavirus\"[Title/Abstract]) NOT 31978945[PMID]";

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("term", expected_query))
        .and(query_param("sort", "relevance"))
        .and(query_param("retmax", "5"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(esearch_json(&["32015507", "32015508"], 9000)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/esummary.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esummary_json(
            &["32015507", "32015508"],
            &[
                esummary_record("32015507", "A pneumonia outbreak", Some("PMC7095418")),
                esummary_record("32015508", "Early transmission dynamics", None),
            ],
        )))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let similar = client.find_similar(SEED_PMID, 5).await;

    assert_eq!(similar.reference_pmid, SEED_PMID);
    assert!(similar.error.is_none());
    assert_eq!(similar.count, 2);
    assert_eq!(similar.items[0].pmid, "32015507");
    assert!(similar.items.iter().all(|item| item.pmid != SEED_PMID));
}

#[tokio::test]
#[traced_test]
async fn test_limit_is_clamped() {
    let mock_server = MockServer::start().await;

    mount_seed(&mock_server, "Pneumonia outbreak", &["Pneumonia"]).await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("retmax", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_json(&[], 0)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let similar = client.find_similar(SEED_PMID, 500).await;

    assert_eq!(similar.error.as_deref(), Some("No similar articles found"));
    assert!(similar.items.is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_seed_without_usable_metadata() {
    let mock_server = MockServer::start().await;

    // Every title word is short or a stop word, and there is no MeSH
    mount_seed(&mock_server, "The study of the art", &[]).await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let similar = client.find_similar(SEED_PMID, 10).await;

    assert_eq!(
        similar.error.as_deref(),
        Some("Could not extract metadata for similarity search")
    );
    assert_eq!(similar.count, 0);
}

#[tokio::test]
#[traced_test]
async fn test_seed_fetch_failure_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let similar = client.find_similar(SEED_PMID, 10).await;

    assert!(similar.items.is_empty());
    assert!(similar.error.unwrap().contains("500"));
    assert_eq!(similar.reference_pmid, SEED_PMID);
    // The failed seed fetch stops the flow before any search
    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() != "/esearch.fcgi"));
}
