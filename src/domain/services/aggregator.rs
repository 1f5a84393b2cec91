// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::report::AggregateReport;
use crate::domain::models::service_result::ServiceResult;
use std::collections::BTreeMap;

pub const CATEGORIZED_SUMMARY: &str = "UI/UX recommendations categorized by service.";
pub const NO_FEEDBACK_SUMMARY: &str = "No UI/UX feedback could be generated from the analysis.";

/// 合并各服务的建议
///
/// 只收集非空的建议列表；未执行的服务与失败的服务都不会出现在分类中。
///
/// # 参数
///
/// * `results` - 服务名到可选服务结果的映射
///
/// # 返回值
///
/// 按服务归类的汇总报告
pub fn aggregate<'n, 'r, I>(results: I) -> AggregateReport
where
    I: IntoIterator<Item = (&'n str, Option<&'r ServiceResult>)>,
{
    let categories: BTreeMap<String, Vec<String>> = results
        .into_iter()
        .filter_map(|(name, result)| {
            result
                .filter(|r| !r.recommendations.is_empty())
                .map(|r| (name.to_string(), r.recommendations.clone()))
        })
        .collect();

    let summary = if categories.is_empty() {
        NO_FEEDBACK_SUMMARY
    } else {
        CATEGORIZED_SUMMARY
    };

    AggregateReport {
        summary: summary.to_string(),
        categories,
    }
}
