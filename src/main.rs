// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use uxaudit::application::use_cases::audit_use_case::AuditUseCase;
use uxaudit::config::settings::{AccessibilityMode, CrawlerMode, Settings};
use uxaudit::domain::services::accessibility_service::{
    HtmlAccessibilityAnalyzer, WaveAccessibilityAnalyzer,
};
use uxaudit::domain::services::analyzer::Analyzer;
use uxaudit::domain::services::link_crawler::LinkCrawler;
use uxaudit::domain::services::performance_service::PerformanceService;
use uxaudit::domain::services::security_service::SecurityService;
use uxaudit::domain::services::summary_service::{CommandSummarizer, TextSummarizer};
use uxaudit::engines::browser_engine::BrowserEngine;
use uxaudit::engines::fetch_engine::FetchEngine;
use uxaudit::engines::traits::PageFetcher;
use uxaudit::infrastructure::http_client::RetryClient;
use uxaudit::infrastructure::metrics::init_metrics;
use uxaudit::presentation::routes;
use uxaudit::utils::telemetry;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting uxaudit...");

    // 2. Load configuration
    let settings = Settings::new()?;

    // 3. Initialize Prometheus metrics
    init_metrics(&settings.metrics);

    // 4. Outbound client and analyzers
    let client = Arc::new(RetryClient::new(&settings.http)?);

    let accessibility: Arc<dyn Analyzer> = match settings.accessibility.mode {
        AccessibilityMode::Html => Arc::new(HtmlAccessibilityAnalyzer::new(client.clone())),
        AccessibilityMode::Wave => {
            let summarizer = settings.summarizer.enabled.then(|| {
                Arc::new(CommandSummarizer::new(settings.summarizer.clone()))
                    as Arc<dyn TextSummarizer>
            });
            Arc::new(WaveAccessibilityAnalyzer::new(
                client.clone(),
                settings.accessibility.clone(),
                summarizer,
            ))
        }
    };
    let performance: Arc<dyn Analyzer> =
        Arc::new(PerformanceService::new(client.clone(), settings.pagespeed.clone()));
    let security: Arc<dyn Analyzer> =
        Arc::new(SecurityService::new(client.clone(), settings.security.clone()));

    // 5. Page fetcher for full scans
    let fetcher: Arc<dyn PageFetcher> = match settings.crawler.mode {
        CrawlerMode::Fetch => Arc::new(FetchEngine::new(settings.http.user_agent.clone())),
        CrawlerMode::Browser => Arc::new(BrowserEngine),
    };
    let crawler = Arc::new(LinkCrawler::new(fetcher, settings.crawler.clone()));
    info!(
        accessibility = ?settings.accessibility.mode,
        crawler = ?settings.crawler.mode,
        "Analyzers configured"
    );

    let use_case = Arc::new(AuditUseCase::new(accessibility, performance, security, crawler));
    let app = routes::app(use_case, &settings.server);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
