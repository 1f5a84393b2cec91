// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::{
    application::dto::{
        analyze_request::AnalyzeRequestDto,
        analyze_response::{AnalyzeResponseDto, FullScanResponseDto, PageReportDto},
    },
    domain::{
        models::{
            report::{AggregateReport, AnalysisResults},
            scan_request::ScanRequest,
            service_result::ServiceResult,
        },
        services::{aggregator::aggregate, analyzer::Analyzer, link_crawler::LinkCrawler},
    },
};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, instrument};
use validator::Validate;

#[derive(Error, Debug)]
pub enum AuditUseCaseError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// UI/UX 审计用例
///
/// 同一页面的三项分析按 可访问性、性能、安全 的顺序依次执行，
/// 全站扫描时逐页处理
pub struct AuditUseCase {
    accessibility: Arc<dyn Analyzer>,
    performance: Arc<dyn Analyzer>,
    security: Arc<dyn Analyzer>,
    crawler: Arc<LinkCrawler>,
}

impl AuditUseCase {
    pub fn new(
        accessibility: Arc<dyn Analyzer>,
        performance: Arc<dyn Analyzer>,
        security: Arc<dyn Analyzer>,
        crawler: Arc<LinkCrawler>,
    ) -> Self {
        Self {
            accessibility,
            performance,
            security,
            crawler,
        }
    }

    fn validate(dto: &AnalyzeRequestDto) -> Result<ScanRequest, AuditUseCaseError> {
        dto.validate()
            .map_err(|e| AuditUseCaseError::ValidationError(e.to_string()))?;
        dto.to_scan_request().ok_or_else(|| {
            AuditUseCaseError::ValidationError(format!("invalid url: {}", dto.url))
        })
    }

    /// 分析单个页面并汇总建议
    pub async fn analyze(
        &self,
        dto: AnalyzeRequestDto,
    ) -> Result<AnalyzeResponseDto, AuditUseCaseError> {
        let request = Self::validate(&dto)?;
        let (all_results, final_recommendation) = self.analyze_page(&request).await;

        Ok(AnalyzeResponseDto {
            final_recommendation,
            all_results,
        })
    }

    /// 发现同站页面并逐页分析
    pub async fn full_scan(
        &self,
        dto: AnalyzeRequestDto,
    ) -> Result<FullScanResponseDto, AuditUseCaseError> {
        let request = Self::validate(&dto)?;
        let pages = self.crawler.pages_for(&request.url).await;

        let mut reports = Vec::with_capacity(pages.len());
        for page in pages {
            let page_request = request.for_page(page);
            let (results, final_recommendation) = self.analyze_page(&page_request).await;
            reports.push(PageReportDto::new(
                page_request.url.to_string(),
                results,
                final_recommendation,
            ));
        }

        info!(base_url = %request.url, pages = reports.len(), "Full scan finished");
        Ok(FullScanResponseDto {
            base_url: request.url.to_string(),
            total_pages_scanned: reports.len(),
            pages: reports,
        })
    }

    /// 按请求的开关执行分析
    #[instrument(skip(self, request), fields(url = %request.url))]
    pub async fn analyze_page(&self, request: &ScanRequest) -> (AnalysisResults, AggregateReport) {
        let mut results = AnalysisResults::default();

        if request.run_accessibility {
            results.accessibility = Some(self.run(self.accessibility.as_ref(), request).await);
        }
        if request.run_performance {
            results.pagespeed = Some(self.run(self.performance.as_ref(), request).await);
        }
        if request.run_security {
            results.security = Some(self.run(self.security.as_ref(), request).await);
        }

        metrics::counter!("pages_scanned_total").increment(1);
        let report = aggregate(results.iter());
        (results, report)
    }

    async fn run(&self, analyzer: &dyn Analyzer, request: &ScanRequest) -> ServiceResult {
        let started = Instant::now();
        let result = analyzer.analyze(&request.url).await;
        let elapsed = started.elapsed();

        metrics::histogram!("analysis_duration_seconds", "service" => analyzer.name())
            .record(elapsed.as_secs_f64());
        info!(
            service = analyzer.name(),
            elapsed_ms = elapsed.as_millis() as u64,
            failed = result.is_error(),
            "Analysis finished"
        );
        result
    }
}
