//! Mocked tests showing that the shared limiter paces real HTTP traffic

use std::time::{Duration, Instant};

use pubmed_gateway::{Client, ClientConfig, Gateway, HttpMethod};
use tracing_test::traced_test;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{esearch_json, mock_config};

async fn mount_ok(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(mock_server)
        .await;
}

#[tokio::test]
#[traced_test]
async fn test_sequential_calls_are_paced() {
    let mock_server = MockServer::start().await;
    mount_ok(&mock_server).await;

    let config = mock_config(&mock_server).with_rate_limit(3);
    let gateway = Gateway::new(&config).expect("gateway");
    let url = format!("{}/esearch.fcgi", mock_server.uri());

    let start = Instant::now();
    for _ in 0..7 {
        gateway
            .call_text(&url, &[], HttpMethod::Get)
            .await
            .expect("request succeeds");
    }

    // 3 + 3 + 1 requests need at least two full windows
    assert!(start.elapsed() >= Duration::from_millis(1900));
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 7);
}

#[tokio::test]
#[traced_test]
async fn test_concurrent_calls_share_one_budget() {
    let mock_server = MockServer::start().await;
    mount_ok(&mock_server).await;

    let config = mock_config(&mock_server).with_rate_limit(3);
    let gateway = Gateway::new(&config).expect("gateway");
    let url = format!("{}/esearch.fcgi", mock_server.uri());

    let start = Instant::now();
    let handles: Vec<_> = (0..6)
        .map(|_| {
            let gateway = gateway.clone();
            let url = url.clone();
            tokio::spawn(async move { gateway.call_text(&url, &[], HttpMethod::Get).await })
        })
        .collect();

    for handle in handles {
        handle.await.expect("task").expect("request succeeds");
    }

    assert!(start.elapsed() >= Duration::from_millis(950));
}

#[tokio::test]
#[traced_test]
async fn test_api_key_raises_the_budget() {
    let mock_server = MockServer::start().await;
    mount_ok(&mock_server).await;

    // No rate override: the key alone decides the budget
    let config = ClientConfig::new()
        .with_base_url(mock_server.uri())
        .with_api_key("secret-key");
    let gateway = Gateway::new(&config).expect("gateway");
    assert_eq!(gateway.rate_limiter().max_requests(), 10);

    let url = format!("{}/esearch.fcgi", mock_server.uri());
    let start = Instant::now();
    for _ in 0..10 {
        gateway
            .call_text(&url, &[], HttpMethod::Get)
            .await
            .expect("request succeeds");
    }

    assert!(start.elapsed() < Duration::from_millis(900));
}

#[tokio::test]
#[traced_test]
async fn test_pubmed_and_pmc_calls_draw_from_the_same_limiter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_json(&[], 0)))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<pmc-articleset/>"))
        .mount(&mock_server)
        .await;

    let config = mock_config(&mock_server).with_rate_limit(2);
    let client = Client::with_config(&config).expect("client");

    client.pubmed.count("asthma").await.expect("count");
    client.pmc.fetch_jats_xml("PMC7906746").await.expect("jats");

    assert_eq!(client.rate_limiter().in_flight().await, 2);
    assert!(!client.rate_limiter().check_available().await);
}
