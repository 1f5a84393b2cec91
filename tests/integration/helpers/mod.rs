// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use uxaudit::application::use_cases::audit_use_case::AuditUseCase;
use uxaudit::config::settings::{
    CrawlerMode, CrawlerSettings, PageSpeedSettings, SecuritySettings, ServerSettings,
};
use uxaudit::domain::services::accessibility_service::HtmlAccessibilityAnalyzer;
use uxaudit::domain::services::link_crawler::LinkCrawler;
use uxaudit::domain::services::performance_service::PerformanceService;
use uxaudit::domain::services::security_service::SecurityService;
use uxaudit::engines::fetch_engine::FetchEngine;
use uxaudit::infrastructure::http_client::RetryClient;
use uxaudit::presentation::routes;
use uxaudit::utils::retry_policy::RetryPolicy;
use wiremock::MockServer;

pub const PAGESPEED_PATH: &str = "/pagespeedonline/v5/runPagespeed";
pub const SSLLABS_PATH: &str = "/ssllabs/api/v3/analyze";

/// 所有外部服务都指向同一个 wiremock 实例
pub struct TestApp {
    pub server: TestServer,
    pub upstream: MockServer,
}

impl TestApp {
    pub fn page_url(&self, path: &str) -> String {
        format!("{}{}", self.upstream.uri(), path)
    }

    pub async fn request_count(&self) -> usize {
        self.upstream
            .received_requests()
            .await
            .map(|r| r.len())
            .unwrap_or(0)
    }
}

pub async fn create_test_app() -> TestApp {
    create_test_app_with_max_pages(50).await
}

pub async fn create_test_app_with_max_pages(max_pages: usize) -> TestApp {
    let upstream = MockServer::start().await;

    let client = Arc::new(RetryClient::with_policy(
        reqwest::Client::builder()
            .user_agent("UIUXAnalyzer/1.0")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap(),
        RetryPolicy::fixed(3, Duration::from_millis(10)),
    ));

    let accessibility = Arc::new(HtmlAccessibilityAnalyzer::new(client.clone()));
    let performance = Arc::new(PerformanceService::new(
        client.clone(),
        PageSpeedSettings {
            base_url: format!("{}{}", upstream.uri(), PAGESPEED_PATH),
            api_key: None,
            locale: "en_US".to_string(),
            categories: vec!["performance".to_string(), "accessibility".to_string()],
        },
    ));
    let security = Arc::new(SecurityService::new(
        client.clone(),
        SecuritySettings {
            base_url: format!("{}/ssllabs/api/v3", upstream.uri()),
            max_polls: 3,
            poll_interval_ms: 10,
        },
    ));
    let crawler = Arc::new(LinkCrawler::new(
        Arc::new(FetchEngine::new("UIUXAnalyzer/1.0")),
        CrawlerSettings {
            mode: CrawlerMode::Fetch,
            timeout_secs: 5,
            render_wait_ms: 0,
            max_pages,
        },
    ));

    let use_case = Arc::new(AuditUseCase::new(
        accessibility,
        performance,
        security,
        crawler,
    ));
    let server_settings = ServerSettings {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_allowed_origins: vec!["https://auto-ux.vercel.app".to_string()],
    };

    let server = TestServer::new(routes::app(use_case, &server_settings)).unwrap();
    TestApp { server, upstream }
}

/// 带有一张缺少 alt 的图片且没有 title 的页面
pub const PAGE_WITH_ISSUES: &str = r#"<html><head></head><body>
    <main role="main"><img src="/hero.png"><a href="/pricing#plans">Pricing</a></main>
</body></html>"#;

/// PageSpeed 响应，移动端与桌面端共用
pub fn pagespeed_body(performance_score: f64) -> Value {
    json!({
        "lighthouseResult": {
            "categories": {
                "performance": { "score": performance_score },
                "accessibility": { "score": 0.9 },
                "best-practices": { "score": 1.0 },
                "seo": { "score": 0.95 }
            },
            "audits": {
                "first-contentful-paint": { "displayValue": "1.2 s" },
                "speed-index": { "displayValue": "2.0 s" },
                "largest-contentful-paint": { "displayValue": "2.5 s" },
                "interactive": { "displayValue": "3.1 s" },
                "total-blocking-time": { "displayValue": "150 ms" },
                "cumulative-layout-shift": { "displayValue": "0.01" },
                "viewport": { "score": 1 }
            }
        }
    })
}

pub fn ssllabs_ready_body() -> Value {
    json!({
        "status": "READY",
        "endpoints": [{
            "ipAddress": "127.0.0.1",
            "serverName": "localhost",
            "statusMessage": "Ready",
            "grade": "A+",
            "details": {
                "forwardSecrecy": 2,
                "supportsRc4": false,
                "hstsPolicy": { "status": "present", "longMaxAge": true },
                "cert": { "issues": 0, "notAfter": 1893456000000u64 }
            }
        }]
    })
}
