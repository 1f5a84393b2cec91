// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::PageSpeedSettings;
use crate::domain::models::report::PAGESPEED;
use crate::domain::models::service_result::{MetricsBuilder, ServiceResult};
use crate::domain::services::analyzer::Analyzer;
use crate::infrastructure::http_client::{HttpClientError, RetryClient};
use async_trait::async_trait;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

/// Lighthouse 中与界面相关的审计项
const UI_AUDITS: [&str; 4] = ["color-contrast", "font-size", "tap-targets", "image-aspect-ratio"];

const NOT_AVAILABLE: &str = "N/A";

/// PageSpeed 测试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Mobile,
    Desktop,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Mobile => "mobile",
            Strategy::Desktop => "desktop",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Mobile => "Mobile",
            Strategy::Desktop => "Desktop",
        }
    }
}

/// 受影响的DOM节点
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AffectedNode {
    pub path: String,
    pub snippet: String,
}

/// 界面审计问题
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiIssue {
    pub title: Option<String>,
    pub description: Option<String>,
    pub help: Option<String>,
    pub nodes: Vec<AffectedNode>,
}

/// 按审计项顺序保存的界面问题，序列化为以审计项为键的对象
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiIssues(Vec<(String, UiIssue)>);

impl UiIssues {
    pub fn get(&self, audit: &str) -> Option<&UiIssue> {
        self.0
            .iter()
            .find(|(key, _)| key == audit)
            .map(|(_, issue)| issue)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UiIssue)> {
        self.0.iter().map(|(key, issue)| (key.as_str(), issue))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for UiIssues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, issue) in &self.0 {
            map.serialize_entry(key, issue)?;
        }
        map.end()
    }
}

/// 单个策略下提取出的性能指标
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileDetails {
    pub overall_score: i64,
    pub first_contentful_paint: String,
    pub speed_index: String,
    pub time_to_interactive: String,
    pub total_blocking_time: String,
    pub largest_contentful_paint: String,
    pub cumulative_layout_shift: String,
    pub mobile_friendly: f64,
    pub render_blocking_resources: f64,
    pub uses_rel_preconnect: f64,
    pub server_response_time: String,
    pub uses_text_compression: f64,
    pub uses_optimized_images: f64,
    pub uses_webp_images: f64,
    pub efficient_animated_content: f64,
    pub unused_javascript: Vec<Value>,
    pub unused_css_rules: Vec<Value>,
    pub diagnostics: Vec<Value>,
    pub ui_issues: UiIssues,
}

/// 单个策略的结果：成功时为指标，失败时只包含错误信息
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProfileReport {
    Details(Box<ProfileDetails>),
    Failed { error: String },
}

fn audit<'a>(audits: &'a Value, key: &str) -> Option<&'a Value> {
    audits.get(key).filter(|a| a.is_object())
}

fn display_value(audits: &Value, key: &str) -> String {
    audit(audits, key)
        .and_then(|a| a.get("displayValue"))
        .and_then(Value::as_str)
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

/// 审计分数，缺失或为 null 时视为 1（不是问题）
fn score(audits: &Value, key: &str) -> f64 {
    audit(audits, key)
        .and_then(|a| a.get("score"))
        .and_then(Value::as_f64)
        .unwrap_or(1.0)
}

fn detail_items(audits: &Value, key: &str) -> Vec<Value> {
    audit(audits, key)
        .and_then(|a| a.pointer("/details/items"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

fn optional_str(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn extract_ui_issues(audits: &Value) -> UiIssues {
    let mut issues = Vec::new();

    for key in UI_AUDITS {
        let Some(audit) = audit(audits, key) else {
            continue;
        };
        if audit.get("score").and_then(Value::as_f64).unwrap_or(1.0) >= 1.0 {
            continue;
        }

        let nodes = audit
            .pointer("/details/items")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.get("node").filter(|n| n.is_object()))
                    .filter_map(|node| {
                        let snippet = node.get("snippet").and_then(Value::as_str)?;
                        let path = node
                            .get("path")
                            .and_then(Value::as_str)
                            .or_else(|| node.get("selector").and_then(Value::as_str))
                            .unwrap_or("unknown");
                        Some(AffectedNode {
                            path: path.to_string(),
                            snippet: snippet.to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        issues.push((
            key.to_string(),
            UiIssue {
                title: optional_str(audit, "title"),
                description: optional_str(audit, "description"),
                help: optional_str(audit, "helpText"),
                nodes,
            },
        ));
    }

    UiIssues(issues)
}

/// 从 PageSpeed 响应中提取指标
///
/// 任何缺失字段都使用默认值，不会失败
pub fn extract_profile(data: &Value) -> ProfileDetails {
    let empty = Value::Null;
    let lighthouse = data.get("lighthouseResult").unwrap_or(&empty);
    let audits = lighthouse.get("audits").unwrap_or(&empty);

    let performance_score = lighthouse
        .pointer("/categories/performance/score")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);

    ProfileDetails {
        overall_score: (performance_score * 100.0) as i64,
        first_contentful_paint: display_value(audits, "first-contentful-paint"),
        speed_index: display_value(audits, "speed-index"),
        time_to_interactive: display_value(audits, "interactive"),
        total_blocking_time: display_value(audits, "total-blocking-time"),
        largest_contentful_paint: display_value(audits, "largest-contentful-paint"),
        cumulative_layout_shift: display_value(audits, "cumulative-layout-shift"),
        mobile_friendly: score(audits, "viewport"),
        render_blocking_resources: score(audits, "render-blocking-resources"),
        uses_rel_preconnect: score(audits, "uses-rel-preconnect"),
        server_response_time: display_value(audits, "server-response-time"),
        uses_text_compression: score(audits, "uses-text-compression"),
        uses_optimized_images: score(audits, "uses-optimized-images"),
        uses_webp_images: score(audits, "uses-webp-images"),
        efficient_animated_content: score(audits, "efficient-animated-content"),
        unused_javascript: detail_items(audits, "unused-javascript"),
        unused_css_rules: detail_items(audits, "unused-css-rules"),
        diagnostics: detail_items(audits, "diagnostics"),
        ui_issues: extract_ui_issues(audits),
    }
}

/// 根据阈值规则生成单个策略的建议
pub fn profile_recommendations(details: &ProfileDetails, label: &str) -> Vec<String> {
    let mut recs = Vec::new();

    if details.overall_score < 80 {
        recs.push(format!("{label}: Performance is below optimal. Optimize images, enable compression, and minimize blocking scripts."));
    }
    if details.mobile_friendly == 0.0 {
        recs.push(format!("{label}: Page is not mobile-friendly. Add a meta viewport and use responsive design."));
    }
    if details.uses_optimized_images < 0.9 {
        recs.push(format!("{label}: Serve images in next-gen formats like WebP or AVIF for better loading speed."));
    }
    if details.render_blocking_resources < 0.9 {
        recs.push(format!("{label}: Eliminate or defer render-blocking resources such as CSS and JS."));
    }
    if details.uses_rel_preconnect < 0.9 {
        recs.push(format!("{label}: Consider using resource hints like preconnect or dns-prefetch for critical origins."));
    }
    if details.uses_text_compression < 0.9 {
        recs.push(format!("{label}: Enable text compression (gzip, brotli) on your server."));
    }
    if details.uses_webp_images < 0.9 {
        recs.push(format!("{label}: Convert images to WebP format to reduce size."));
    }
    if details.efficient_animated_content < 0.9 {
        recs.push(format!("{label}: Optimize animated content for better performance."));
    }
    if !details.unused_javascript.is_empty() {
        recs.push(format!(
            "{label}: Remove unused JavaScript ({} scripts identified).",
            details.unused_javascript.len()
        ));
    }
    if !details.unused_css_rules.is_empty() {
        recs.push(format!(
            "{label}: Remove unused CSS rules ({} rules identified).",
            details.unused_css_rules.len()
        ));
    }

    recs
}

/// 汇总两个策略的建议，界面问题标题去重后追加在最后
pub fn build_recommendations(profiles: &[(Strategy, &ProfileReport)]) -> Vec<String> {
    let mut recs = Vec::new();

    for (strategy, report) in profiles {
        if let ProfileReport::Details(details) = report {
            recs.extend(profile_recommendations(details, strategy.label()));
        }
    }

    for (_, report) in profiles {
        let ProfileReport::Details(details) = report else {
            continue;
        };
        for (_, issue) in details.ui_issues.iter() {
            if let Some(title) = &issue.title {
                let rec = format!("General: {title}");
                if !recs.contains(&rec) {
                    recs.push(rec);
                }
            }
        }
    }

    recs
}

/// 性能分析服务
///
/// 调用 PageSpeed Insights（移动端与桌面端各一次）
pub struct PerformanceService {
    client: Arc<RetryClient>,
    settings: PageSpeedSettings,
}

impl PerformanceService {
    pub fn new(client: Arc<RetryClient>, settings: PageSpeedSettings) -> Self {
        Self { client, settings }
    }

    async fn fetch_profile(&self, url: &Url, strategy: Strategy) -> Result<Value, HttpClientError> {
        let mut query: Vec<(&str, &str)> = vec![
            ("url", url.as_str()),
            ("strategy", strategy.as_str()),
            ("locale", self.settings.locale.as_str()),
        ];
        query.extend(self.settings.categories.iter().map(|c| ("category", c.as_str())));
        if let Some(key) = &self.settings.api_key {
            query.push(("key", key.as_str()));
        }

        self.client
            .get_json(PAGESPEED, &self.settings.base_url, &query)
            .await
    }

    /// 执行单个策略，失败时记录在该策略的结果中
    pub async fn run_profile(&self, url: &Url, strategy: Strategy) -> ProfileReport {
        match self.fetch_profile(url, strategy).await {
            Ok(data) => ProfileReport::Details(Box::new(extract_profile(&data))),
            Err(e) => {
                warn!(url = %url, strategy = strategy.as_str(), "PageSpeed request failed: {}", e);
                ProfileReport::Failed {
                    error: format!("PageSpeed API error for {}: {}", strategy.as_str(), e),
                }
            }
        }
    }
}

#[async_trait]
impl Analyzer for PerformanceService {
    async fn analyze(&self, url: &Url) -> ServiceResult {
        let mobile = self.run_profile(url, Strategy::Mobile).await;
        let desktop = self.run_profile(url, Strategy::Desktop).await;

        let recommendations = build_recommendations(&[
            (Strategy::Mobile, &mobile),
            (Strategy::Desktop, &desktop),
        ]);
        info!(url = %url, count = recommendations.len(), "PageSpeed analysis finished");

        let metrics = MetricsBuilder::new()
            .insert("mobile", &mobile)
            .insert("desktop", &desktop)
            .build();

        ServiceResult::success(metrics, recommendations)
    }

    fn name(&self) -> &'static str {
        PAGESPEED
    }
}
