// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::service_result::ServiceResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const ACCESSIBILITY: &str = "accessibility";
pub const PAGESPEED: &str = "pagespeed";
pub const SECURITY: &str = "security";

/// 汇总报告
///
/// 在所有选定的分析完成后一次性构建
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub summary: String,
    pub categories: BTreeMap<String, Vec<String>>,
}

/// 单个页面的全部分析结果，未执行的分析为 `None`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResults {
    pub accessibility: Option<ServiceResult>,
    pub pagespeed: Option<ServiceResult>,
    pub security: Option<ServiceResult>,
}

impl AnalysisResults {
    /// 按服务名遍历结果
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<&ServiceResult>)> {
        [
            (ACCESSIBILITY, self.accessibility.as_ref()),
            (PAGESPEED, self.pagespeed.as_ref()),
            (SECURITY, self.security.as_ref()),
        ]
        .into_iter()
    }
}
