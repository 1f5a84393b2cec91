// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    body::Body,
    http::{header, HeaderValue, Request, StatusCode},
};
use tower::util::ServiceExt;
use uxaudit::presentation::routes;

/// 健康检查测试
///
/// 验证健康检查端点是否正常工作
#[tokio::test]
async fn health_check_works() {
    let app = routes::routes();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn version_reports_crate_version() {
    let app = super::helpers::create_test_app().await;

    let response = app.server.get("/v1/version").await;
    response.assert_status_ok();
    response.assert_text(env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn cors_allows_configured_origin() {
    let app = super::helpers::create_test_app().await;

    let response = app
        .server
        .get("/health")
        .add_header(
            header::ORIGIN,
            HeaderValue::from_static("https://auto-ux.vercel.app"),
        )
        .await;

    response.assert_status_ok();
    let allowed = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .and_then(|v| v.to_str().ok());
    assert_eq!(allowed, Some("https://auto-ux.vercel.app"));
}
