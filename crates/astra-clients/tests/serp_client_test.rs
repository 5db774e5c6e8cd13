//! Contract tests for SerpClient against a serpapi-compatible endpoint.

use std::time::Duration;

use astra_clients::{RetryPolicy, SerpClient, SerpConfig};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(mock_server: &MockServer) -> SerpClient {
    let config = SerpConfig {
        api_url: format!("{}/search", mock_server.uri()).parse().unwrap(),
        api_key: zeroize::Zeroizing::new("serp-key".into()),
        timeout_secs: 5,
        retry: RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        },
    };
    SerpClient::new(config).unwrap()
}

#[tokio::test]
async fn search_sends_engine_query_and_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("engine", "google"))
        .and(query_param("q", "CRM Germany competitors"))
        .and(query_param("num", "10"))
        .and(query_param("api_key", "serp-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "search_information": {"total_results": 98000},
            "organic_results": [
                {"position": 1, "title": "Pipedrive", "link": "https://pipedrive.com", "snippet": "Sales CRM"},
                {"position": 2, "title": "HubSpot", "link": "https://hubspot.com"}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let data = client
        .search("CRM Germany competitors", 10)
        .await
        .unwrap()
        .into_competitor_data();
    assert_eq!(data.total_results, 98000);
    assert_eq!(data.competitors.len(), 2);
    assert_eq!(data.competitors[1].name, "HubSpot");
    assert_eq!(data.competitors[1].estimated_traffic, "3,000-6,000");
}

#[tokio::test]
async fn keyword_lookup_pins_google_domain() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "crm software"))
        .and(query_param("google_domain", "google.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "search_information": {"total_results": 5}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let metrics = client.keyword("crm software").await.unwrap().keyword_metrics();
    assert_eq!(metrics.results_count, Some(5));
}

#[tokio::test]
async fn trends_use_timeseries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("engine", "google_trends"))
        .and(query_param("data_type", "TIMESERIES"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "interest_over_time": {"timeline_data": [{"date": "Jan 2026", "values": []}]}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let trends = client
        .trends("CRM market trends 2026")
        .await
        .unwrap()
        .into_market_trends();
    assert!(trends.interest_over_time.is_some());
    assert_eq!(trends.top_queries, Some(serde_json::json!([])));
}

#[tokio::test]
async fn non_success_status_is_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.search("x", 10).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(!err.to_string().contains("serp-key"));
}
