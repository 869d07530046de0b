//! Tests for the HTTP client module

use super::*;
use crate::auth::{AuthConfig, AuthToken};
use crate::error::Error;
use crate::query::Query;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .no_rate_limit()
        .build();
    HttpClient::with_auth(config, AuthConfig::query(AuthToken::new("k", "t"))).unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.base_url, "https://api.trello.com/1");
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.rate_limit.is_some());
    assert!(config.user_agent.starts_with("trello-fetch/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://trello.example.com/1")
        .timeout(Duration::from_secs(60))
        .header("X-Custom", "value")
        .user_agent("test-agent/1.0")
        .rate_limit(RateLimiterConfig::new(5, 5))
        .build();

    assert_eq!(config.base_url, "https://trello.example.com/1");
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(
        config.default_headers.get("X-Custom"),
        Some(&"value".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(5, 5)));
}

#[test]
fn test_build_url() {
    let client = HttpClient::new().unwrap();

    assert_eq!(
        client.build_url("boards/b1/cards").unwrap().as_str(),
        "https://api.trello.com/1/boards/b1/cards"
    );
    assert_eq!(
        client.build_url("/boards/b1").unwrap().as_str(),
        "https://api.trello.com/1/boards/b1"
    );
    assert_eq!(
        client
            .build_url("https://other.example.com/x")
            .unwrap()
            .as_str(),
        "https://other.example.com/x"
    );
}

#[test]
fn test_build_url_invalid() {
    let config = HttpClientConfig::builder().base_url("not a url").build();
    let client = HttpClient::with_config(config).unwrap();
    assert!(matches!(
        client.build_url("boards"),
        Err(Error::InvalidUrl(_))
    ));
}

#[tokio::test]
async fn test_fetch_page_sends_limit_and_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/boards/b1/lists"))
        .and(query_param("limit", "1000"))
        .and(query_param("filter", "open"))
        .and(query_param("key", "k"))
        .and(query_param("token", "t"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "l1", "name": "To Do"},
            {"id": "l2", "name": "Doing"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let page = client
        .fetch_page("boards/b1/lists", &Query::new().param("filter", "open"))
        .await
        .unwrap();

    let table = page.as_table().unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows()[1]["name"], "Doing");
}

#[tokio::test]
async fn test_fetch_page_flattens_nested_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lists/l1/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "c1", "badges": {"comments": 3}, "idLabels": ["x", "y"]}
        ])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let page = client
        .fetch_page("lists/l1/cards", &Query::new())
        .await
        .unwrap();

    let row = &page.as_table().unwrap().rows()[0];
    assert_eq!(row["badges.comments"], 3);
    assert_eq!(row["idLabels.1"], "y");
}

#[tokio::test]
async fn test_fetch_page_object_is_raw() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/boards/b1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "b1", "name": "Roadmap"})),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let page = client.fetch_page("boards/b1", &Query::new()).await.unwrap();

    assert_eq!(page, crate::flatten::Page::Raw(json!({"id": "b1", "name": "Roadmap"})));
}

#[tokio::test]
async fn test_fetch_page_empty_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cards/c1/checklists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let page = client
        .fetch_page("cards/c1/checklists", &Query::new())
        .await
        .unwrap();

    assert!(page.is_tabular());
    assert_eq!(page.row_count(), Some(0));
}

#[tokio::test]
async fn test_fetch_page_http_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/boards/missing"))
        .respond_with(ResponseTemplate::new(500).set_body_string("x".repeat(2000)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .fetch_page("boards/missing", &Query::new())
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus {
            status,
            reason,
            body,
        } => {
            assert_eq!(status, 500);
            assert_eq!(reason, "Internal Server Error");
            assert!(body.len() < 2000);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_fetch_page_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/members/me"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .fetch_page("members/me", &Query::new())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("invalid token"));
}

#[tokio::test]
async fn test_fetch_page_html_is_format_error() {
    let mock_server = MockServer::start().await;

    // Even a JSON-looking body is rejected when declared as HTML
    Mock::given(method("GET"))
        .and(path("/boards/b1/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "text/html"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .fetch_page("boards/b1/cards", &Query::new())
        .await
        .unwrap_err();

    match err {
        Error::Format { content_type, body } => {
            assert_eq!(content_type, "text/html");
            assert_eq!(body, "[]");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_fetch_page_invalid_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/boards/b1/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("[{", "application/json"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .fetch_page("boards/b1/cards", &Query::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::JsonParse(_)));
}

#[tokio::test]
async fn test_fetch_page_is_idempotent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/boards/b1/labels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "lb1", "name": "bug", "color": "red"},
            {"id": "lb2", "name": "", "color": null}
        ])))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let query = Query::new().param("fields", "name,color");
    let first = client.fetch_page("boards/b1/labels", &query).await.unwrap();
    let second = client.fetch_page("boards/b1/labels", &query).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_default_headers_and_oauth_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/members/me"))
        .and(header("X-Custom", "1"))
        .and(header(
            "Authorization",
            "OAuth oauth_consumer_key=\"k\", oauth_token=\"t\"",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "m1"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .header("X-Custom", "1")
        .no_rate_limit()
        .build();
    let client =
        HttpClient::with_auth(config, AuthConfig::header(AuthToken::new("k", "t"))).unwrap();

    let page = client.fetch_page("members/me", &Query::new()).await.unwrap();
    assert!(!page.is_tabular());
}

#[tokio::test]
async fn test_transport_error_propagates() {
    let config = HttpClientConfig::builder()
        .base_url("http://127.0.0.1:1")
        .timeout(Duration::from_secs(2))
        .no_rate_limit()
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let err = client.fetch_page("boards", &Query::new()).await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn test_transport_error_hides_credentials() {
    let config = HttpClientConfig::builder()
        .base_url("http://127.0.0.1:1")
        .timeout(Duration::from_secs(2))
        .no_rate_limit()
        .build();
    let client = HttpClient::with_auth(
        config,
        AuthConfig::query(AuthToken::new("SECRETKEY", "SECRETTOKEN")),
    )
    .unwrap();

    let err = client
        .fetch_page("boards/b1/cards", &Query::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
    for text in [err.to_string(), format!("{err:?}")] {
        assert!(!text.contains("SECRETKEY"), "key leaked: {text}");
        assert!(!text.contains("SECRETTOKEN"), "token leaked: {text}");
    }
}

#[tokio::test]
async fn test_fetch_page_with_record_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", "release"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "options": {"terms": [{"text": "release"}]},
            "cards": [
                {"id": "c1", "name": "Release notes"},
                {"id": "c2", "name": "Release party"}
            ]
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server)
        .with_flattener(crate::flatten::Flattener::new().with_record_path("cards"));
    let page = client
        .fetch_page("search", &Query::new().param("query", "release"))
        .await
        .unwrap();

    let table = page.as_table().unwrap();
    assert_eq!(table.columns(), &["id", "name"]);
    assert_eq!(table.len(), 2);
}
