// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, create_test_app_with_max_pages, PAGE_WITH_ISSUES};
use axum::http::StatusCode;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

const PRICING_PAGE: &str = r#"<html><head><title>Pricing</title></head>
<body><nav role="navigation"><a href="https://elsewhere.example.org/">Partner</a></nav></body></html>"#;

#[tokio::test]
async fn full_scan_analyzes_base_page_and_internal_links() {
    let app = create_test_app().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE_WITH_ISSUES))
        .mount(&app.upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/pricing"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PRICING_PAGE))
        .mount(&app.upstream)
        .await;

    let base_url = app.page_url("/");
    let response = app
        .server
        .post("/v1/full-scan")
        .json(&json!({
            "url": base_url,
            "is_pagespeed_applied": false,
            "is_security_applied": false
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["base_url"], base_url);
    assert_eq!(body["total_pages_scanned"], 2);

    let pages = body["pages"].as_array().unwrap();
    assert_eq!(pages[0]["url"], base_url);
    assert_eq!(pages[1]["url"], app.page_url("/pricing"));

    assert!(pages.iter().all(|p| p["page_speed"].is_null() && p["security"].is_null()));
    assert_eq!(
        pages[0]["accessibility"]["accessibility_summary"]["images_missing_alt"],
        1
    );
    assert_eq!(
        pages[1]["final_recommendation"]["summary"],
        "No UI/UX feedback could be generated from the analysis."
    );
}

#[tokio::test]
async fn full_scan_respects_page_limit() {
    let app = create_test_app_with_max_pages(1).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE_WITH_ISSUES))
        .mount(&app.upstream)
        .await;

    let response = app
        .server
        .post("/v1/full-scan")
        .json(&json!({
            "url": app.page_url("/"),
            "is_accessibility_applied": false,
            "is_pagespeed_applied": false,
            "is_security_applied": false
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total_pages_scanned"], 1);
}

/// 链接发现失败时只扫描基础页面
#[tokio::test]
async fn full_scan_with_unreachable_site_scans_base_only() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/v1/full-scan")
        .json(&json!({
            "url": "http://127.0.0.1:9/",
            "is_accessibility_applied": false,
            "is_pagespeed_applied": false,
            "is_security_applied": false
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total_pages_scanned"], 1);
    assert_eq!(body["pages"][0]["url"], "http://127.0.0.1:9/");
}

#[tokio::test]
async fn full_scan_rejects_invalid_url() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/v1/full-scan")
        .json(&json!({ "url": "javascript:alert(1)" }))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(app.request_count().await, 0);
}
