// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::service_result::ServiceResult;
use async_trait::async_trait;
use url::Url;

/// 分析服务特质
///
/// 实现方不会返回错误：外部调用失败会被转换为带 `error` 字段的 [`ServiceResult`]，
/// 从而不影响同一请求中的其他分析。
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// 分析给定页面
    async fn analyze(&self, url: &Url) -> ServiceResult;

    /// 服务名，用作汇总报告中的分类键
    fn name(&self) -> &'static str;
}
