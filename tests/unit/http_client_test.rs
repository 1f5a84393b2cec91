// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;
use uxaudit::infrastructure::http_client::RetryClient;
use uxaudit::utils::retry_policy::RetryPolicy;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> RetryClient {
    RetryClient::with_policy(
        reqwest::Client::new(),
        RetryPolicy::fixed(3, Duration::from_millis(5)),
    )
}

#[tokio::test]
async fn rate_limited_requests_are_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/limited"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/limited"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
        .with_priority(2)
        .mount(&server)
        .await;

    let url = format!("{}/limited", server.uri());
    let body = client().get_json("pagespeed", &url, &[]).await.unwrap();

    assert_eq!(body["ok"], true);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn connection_errors_exhaust_attempts() {
    // Nothing listens on the discard port
    let err = client()
        .get("security", "http://127.0.0.1:9/analyze", &[])
        .await
        .unwrap_err();

    assert!(err.is_retryable());
    assert!(err.status().is_none());
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forbidden"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/forbidden", server.uri());
    let err = client().get("accessibility", &url, &[]).await.unwrap_err();

    assert!(!err.is_retryable());
    assert_eq!(err.status(), Some(reqwest::StatusCode::FORBIDDEN));
}
