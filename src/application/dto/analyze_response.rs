// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::report::{AggregateReport, AnalysisResults};
use crate::domain::models::service_result::ServiceResult;
use serde::{Deserialize, Serialize};

/// `/v1/analyze` 的响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponseDto {
    pub final_recommendation: AggregateReport,
    pub all_results: AnalysisResults,
}

/// 全站扫描中单个页面的结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageReportDto {
    pub url: String,
    pub page_speed: Option<ServiceResult>,
    pub accessibility: Option<ServiceResult>,
    pub security: Option<ServiceResult>,
    pub final_recommendation: AggregateReport,
}

impl PageReportDto {
    pub fn new(url: String, results: AnalysisResults, final_recommendation: AggregateReport) -> Self {
        Self {
            url,
            page_speed: results.pagespeed,
            accessibility: results.accessibility,
            security: results.security,
            final_recommendation,
        }
    }
}

/// `/v1/full-scan` 的响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullScanResponseDto {
    pub base_url: String,
    pub total_pages_scanned: usize,
    pub pages: Vec<PageReportDto>,
}
