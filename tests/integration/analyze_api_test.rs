// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    create_test_app, pagespeed_body, ssllabs_ready_body, PAGESPEED_PATH, PAGE_WITH_ISSUES,
    SSLLABS_PATH,
};
use axum::http::StatusCode;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

/// 非法地址在发起任何外部请求前被拒绝
#[tokio::test]
async fn analyze_rejects_invalid_url_without_outbound_calls() {
    let app = create_test_app().await;

    for url in ["not-a-url", "ftp://example.com/file", "example.com"] {
        let response = app
            .server
            .post("/v1/analyze")
            .json(&json!({ "url": url }))
            .expect_failure()
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["error"].as_str().unwrap().contains("Validation failed"));
    }

    assert_eq!(app.request_count().await, 0);
}

#[tokio::test]
async fn analyze_rejects_missing_url() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/v1/analyze")
        .json(&json!({ "is_security_applied": false }))
        .expect_failure()
        .await;

    assert!(response.status_code().is_client_error());
    assert_eq!(app.request_count().await, 0);
}

#[tokio::test]
async fn analyze_with_all_flags_disabled_gives_no_feedback() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/v1/analyze")
        .json(&json!({
            "url": "https://example.com",
            "is_accessibility_applied": false,
            "is_pagespeed_applied": false,
            "is_security_applied": false
        }))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "final_recommendation": {
            "summary": "No UI/UX feedback could be generated from the analysis.",
            "categories": {}
        },
        "all_results": {
            "accessibility": null,
            "pagespeed": null,
            "security": null
        }
    }));
    assert_eq!(app.request_count().await, 0);
}

#[tokio::test]
async fn analyze_accessibility_only() {
    let app = create_test_app().await;

    Mock::given(method("GET"))
        .and(path("/landing"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE_WITH_ISSUES))
        .mount(&app.upstream)
        .await;

    let response = app
        .server
        .post("/v1/analyze")
        .json(&json!({
            "url": app.page_url("/landing"),
            "is_pagespeed_applied": false,
            "is_security_applied": false
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();

    let summary = &body["all_results"]["accessibility"]["accessibility_summary"];
    assert_eq!(summary["images_missing_alt"], 1);
    assert_eq!(summary["missing_title"], true);
    assert_eq!(summary["missing_landmarks"], false);

    let recs = body["final_recommendation"]["categories"]["accessibility"]
        .as_array()
        .unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(
        body["final_recommendation"]["summary"],
        "UI/UX recommendations categorized by service."
    );
    assert!(body["all_results"]["pagespeed"].is_null());
}

/// 页面抓取失败时可访问性结果为错误，其余分析不受影响
#[tokio::test]
async fn analyze_accessibility_failure_is_isolated() {
    let app = create_test_app().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&app.upstream)
        .await;
    Mock::given(method("GET"))
        .and(path(SSLLABS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(ssllabs_ready_body()))
        .mount(&app.upstream)
        .await;

    let response = app
        .server
        .post("/v1/analyze")
        .json(&json!({
            "url": app.page_url("/missing"),
            "is_pagespeed_applied": false
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();

    let error = body["all_results"]["accessibility"]["error"].as_str().unwrap();
    assert!(error.starts_with("Accessibility check error:"));
    assert!(body["final_recommendation"]["categories"]
        .get("accessibility")
        .is_none());
    assert_eq!(body["all_results"]["security"]["ssllabs_grade"], "A+");
    assert!(body["final_recommendation"]["categories"]["security"]
        .as_array()
        .unwrap()
        .contains(&json!("HSTS is enabled.")));
}

/// 桌面端调用持续失败时只影响该策略的结果
#[tokio::test]
async fn analyze_pagespeed_with_failing_desktop_profile() {
    let app = create_test_app().await;

    Mock::given(method("GET"))
        .and(path(PAGESPEED_PATH))
        .and(query_param("strategy", "mobile"))
        .and(query_param("category", "accessibility"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pagespeed_body(0.5)))
        .expect(1)
        .mount(&app.upstream)
        .await;
    Mock::given(method("GET"))
        .and(path(PAGESPEED_PATH))
        .and(query_param("strategy", "desktop"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&app.upstream)
        .await;

    let response = app
        .server
        .post("/v1/analyze")
        .json(&json!({
            "url": "https://example.com",
            "is_accessibility_applied": false,
            "is_security_applied": false
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let pagespeed = &body["all_results"]["pagespeed"];

    assert_eq!(pagespeed["mobile"]["overall_score"], 50);
    assert_eq!(pagespeed["mobile"]["first_contentful_paint"], "1.2 s");
    assert!(pagespeed["desktop"]["error"]
        .as_str()
        .unwrap()
        .starts_with("PageSpeed API error for desktop:"));
    assert!(pagespeed.get("error").is_none());

    let recs = body["final_recommendation"]["categories"]["pagespeed"]
        .as_array()
        .unwrap();
    assert_eq!(
        recs[0],
        "Mobile: Performance is below optimal. Optimize images, enable compression, and minimize blocking scripts."
    );
    assert!(recs.iter().all(|r| !r.as_str().unwrap().starts_with("Desktop:")));
}

#[tokio::test]
async fn analyze_security_polls_until_ready() {
    let app = create_test_app().await;

    Mock::given(method("GET"))
        .and(path(SSLLABS_PATH))
        .and(query_param("publish", "off"))
        .and(query_param("all", "done"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "DNS" })))
        .expect(1)
        .mount(&app.upstream)
        .await;
    Mock::given(method("GET"))
        .and(path(SSLLABS_PATH))
        .and(query_param("fromCache", "on"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "IN_PROGRESS" })))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&app.upstream)
        .await;
    Mock::given(method("GET"))
        .and(path(SSLLABS_PATH))
        .and(query_param("fromCache", "on"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ssllabs_ready_body()))
        .with_priority(2)
        .mount(&app.upstream)
        .await;

    let response = app
        .server
        .post("/v1/analyze")
        .json(&json!({
            "url": "https://example.com/account",
            "is_accessibility_applied": false,
            "is_pagespeed_applied": false
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let security = &body["all_results"]["security"];

    assert_eq!(security["ssllabs_grade"], "A+");
    assert_eq!(security["assessment_status"], "READY");
    assert_eq!(security["endpoint_info"]["serverName"], "localhost");
    assert_eq!(
        security["recommendations"],
        json!([
            "Site has a strong SSL/TLS configuration with a grade of A+.",
            "Ensure continued support for Forward Secrecy across all modern browsers.",
            "RC4 cipher is disabled, which is recommended.",
            "HSTS is enabled.",
            "HSTS max-age is sufficiently long for preloading (helps maintain A+).",
            "Certificate chain is complete and valid.",
            "Certificate is valid and not expired."
        ])
    );

    let requests = app.upstream.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    assert!(requests
        .iter()
        .all(|r| r.url.query().unwrap_or_default().contains("host=example.com")));
}
