// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::extract::{Extension, Json};
use std::sync::Arc;

use crate::{
    application::{
        dto::{
            analyze_request::AnalyzeRequestDto,
            analyze_response::{AnalyzeResponseDto, FullScanResponseDto},
        },
        use_cases::audit_use_case::AuditUseCase,
    },
    presentation::errors::AppError,
};

/// 分析单个页面
///
/// # 错误
///
/// 地址校验失败时返回 400，且不会发起任何外部请求
pub async fn analyze(
    Extension(use_case): Extension<Arc<AuditUseCase>>,
    Json(payload): Json<AnalyzeRequestDto>,
) -> Result<Json<AnalyzeResponseDto>, AppError> {
    let response = use_case.analyze(payload).await?;
    Ok(Json(response))
}

/// 扫描目标页面及其同站链接
pub async fn full_scan(
    Extension(use_case): Extension<Arc<AuditUseCase>>,
    Json(payload): Json<AnalyzeRequestDto>,
) -> Result<Json<FullScanResponseDto>, AppError> {
    let response = use_case.full_scan(payload).await?;
    Ok(Json(response))
}
