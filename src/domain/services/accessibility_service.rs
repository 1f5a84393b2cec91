// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::AccessibilitySettings;
use crate::domain::models::report::ACCESSIBILITY;
use crate::domain::models::service_result::{MetricsBuilder, ServiceResult};
use crate::domain::services::analyzer::Analyzer;
use crate::domain::services::summary_service::TextSummarizer;
use crate::infrastructure::http_client::{HttpClientError, RetryClient};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

/// 不需要关联 label 的 input 类型
const UNLABELABLE_INPUT_TYPES: [&str; 5] = ["hidden", "submit", "reset", "button", "image"];

/// HTML 检查结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccessibilitySummary {
    pub images_missing_alt: usize,
    pub missing_title: bool,
    pub missing_landmarks: bool,
    pub unlabeled_form_elements: usize,
}

impl AccessibilitySummary {
    pub fn recommendations(&self) -> Vec<String> {
        let mut recs = Vec::new();

        if self.images_missing_alt > 0 {
            recs.push(format!(
                "Found {} images missing alt attributes. Add descriptive alt text for all images.",
                self.images_missing_alt
            ));
        }
        if self.missing_title {
            recs.push("Missing or empty <title> tag. Add a descriptive page title.".to_string());
        }
        if self.missing_landmarks {
            recs.push("No ARIA landmark roles found. Use roles like 'banner', 'navigation', 'main', and 'contentinfo' for better navigation.".to_string());
        }
        if self.unlabeled_form_elements > 0 {
            recs.push(format!(
                "Found {} form elements without associated labels. Ensure all form inputs have labels.",
                self.unlabeled_form_elements
            ));
        }

        recs
    }
}

/// 检查用到的选择器，进程内只解析一次
struct CheckSelectors {
    images: Selector,
    title: Selector,
    landmarks: Selector,
    label_targets: Selector,
    form_controls: Selector,
}

impl CheckSelectors {
    fn parse() -> Option<Self> {
        Some(Self {
            images: Selector::parse("img").ok()?,
            title: Selector::parse("title").ok()?,
            landmarks: Selector::parse("[role]").ok()?,
            label_targets: Selector::parse("label[for]").ok()?,
            form_controls: Selector::parse("input, select, textarea").ok()?,
        })
    }
}

static CHECK_SELECTORS: Lazy<Option<CheckSelectors>> = Lazy::new(CheckSelectors::parse);

fn is_labelable(element: &ElementRef) -> bool {
    let el = element.value();
    if el.name() != "input" {
        return true;
    }
    let input_type = el.attr("type").unwrap_or("text").to_ascii_lowercase();
    !UNLABELABLE_INPUT_TYPES.contains(&input_type.as_str())
}

fn inside_label(element: &ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| ancestor.value().name() == "label")
}

/// 解析HTML并执行基础可访问性检查
pub fn check_html(html: &str) -> AccessibilitySummary {
    let Some(selectors) = CHECK_SELECTORS.as_ref() else {
        warn!("Accessibility selectors failed to parse; skipping HTML checks");
        return AccessibilitySummary::default();
    };
    let document = Html::parse_document(html);

    let images_missing_alt = document
        .select(&selectors.images)
        .filter(|img| img.value().attr("alt").map_or(true, |alt| alt.trim().is_empty()))
        .count();

    let missing_title = document
        .select(&selectors.title)
        .next()
        .map_or(true, |title| title.text().collect::<String>().trim().is_empty());

    let missing_landmarks = document.select(&selectors.landmarks).next().is_none();

    let label_targets: HashSet<&str> = document
        .select(&selectors.label_targets)
        .filter_map(|label| label.value().attr("for"))
        .collect();

    let unlabeled_form_elements = document
        .select(&selectors.form_controls)
        .filter(is_labelable)
        .filter(|control| {
            let referenced = control
                .value()
                .id()
                .is_some_and(|id| label_targets.contains(id));
            !referenced && !inside_label(control)
        })
        .count();

    AccessibilitySummary {
        images_missing_alt,
        missing_title,
        missing_landmarks,
        unlabeled_form_elements,
    }
}

/// 基于HTML解析的可访问性分析
pub struct HtmlAccessibilityAnalyzer {
    client: Arc<RetryClient>,
}

impl HtmlAccessibilityAnalyzer {
    pub fn new(client: Arc<RetryClient>) -> Self {
        Self { client }
    }

    async fn fetch_html(&self, url: &Url) -> Result<String, HttpClientError> {
        let response = self.client.get(ACCESSIBILITY, url.as_str(), &[]).await?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl Analyzer for HtmlAccessibilityAnalyzer {
    async fn analyze(&self, url: &Url) -> ServiceResult {
        let html = match self.fetch_html(url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(url = %url, "Accessibility page fetch failed: {}", e);
                return ServiceResult::failure(format!("Accessibility check error: {}", e));
            }
        };

        let summary = check_html(&html);
        let recommendations = summary.recommendations();
        info!(url = %url, ?summary, "Accessibility check finished");

        let metrics = MetricsBuilder::new()
            .insert("accessibility_summary", &summary)
            .build();
        ServiceResult::success(metrics, recommendations)
    }

    fn name(&self) -> &'static str {
        ACCESSIBILITY
    }
}

/// WAVE 报告中的分类计数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WaveSummary {
    pub errors: u64,
    pub contrast_errors: u64,
    pub alerts: u64,
    pub features: u64,
    pub structural_elements: u64,
    pub aria: u64,
}

impl WaveSummary {
    pub fn from_report(report: &Value) -> Self {
        let count = |category: &str| {
            report
                .pointer(&format!("/categories/{category}/count"))
                .and_then(Value::as_u64)
                .unwrap_or(0)
        };

        Self {
            errors: count("error"),
            contrast_errors: count("contrast"),
            alerts: count("alert"),
            features: count("feature"),
            structural_elements: count("structure"),
            aria: count("aria"),
        }
    }

    pub fn recommendations(&self) -> Vec<String> {
        let mut recs = Vec::new();

        if self.errors > 0 {
            recs.push(format!("Fix {} accessibility errors reported by WAVE.", self.errors));
        }
        if self.contrast_errors > 0 {
            recs.push(format!(
                "Resolve {} color contrast errors to meet WCAG AA.",
                self.contrast_errors
            ));
        }
        if self.alerts > 0 {
            recs.push(format!("Review {} accessibility alerts flagged by WAVE.", self.alerts));
        }
        if self.aria == 0 {
            recs.push("No ARIA attributes detected. Consider adding landmarks and labels where native semantics are insufficient.".to_string());
        }

        recs
    }
}

/// 委托 WAVE API 的可访问性分析，可选地生成自然语言摘要
pub struct WaveAccessibilityAnalyzer {
    client: Arc<RetryClient>,
    settings: AccessibilitySettings,
    summarizer: Option<Arc<dyn TextSummarizer>>,
}

impl WaveAccessibilityAnalyzer {
    pub fn new(
        client: Arc<RetryClient>,
        settings: AccessibilitySettings,
        summarizer: Option<Arc<dyn TextSummarizer>>,
    ) -> Self {
        Self {
            client,
            settings,
            summarizer,
        }
    }

    async fn fetch_report(&self, url: &Url, api_key: &str) -> Result<Value, HttpClientError> {
        let report_type = self.settings.wave_report_type.to_string();
        self.client
            .get_json(
                ACCESSIBILITY,
                &self.settings.wave_base_url,
                &[
                    ("key", api_key),
                    ("url", url.as_str()),
                    ("reporttype", report_type.as_str()),
                ],
            )
            .await
    }
}

#[async_trait]
impl Analyzer for WaveAccessibilityAnalyzer {
    async fn analyze(&self, url: &Url) -> ServiceResult {
        let Some(api_key) = self.settings.wave_api_key.as_deref() else {
            return ServiceResult::failure("Accessibility check error: WAVE API key not configured");
        };

        let report = match self.fetch_report(url, api_key).await {
            Ok(report) => report,
            Err(e) => {
                warn!(url = %url, "WAVE request failed: {}", e);
                return ServiceResult::failure(format!("Accessibility check error: {}", e));
            }
        };

        if report.pointer("/status/success").and_then(Value::as_bool) == Some(false) {
            let message = report
                .pointer("/status/error")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return ServiceResult::failure(format!("WAVE API error: {}", message));
        }

        let summary = WaveSummary::from_report(&report);
        let recommendations = summary.recommendations();

        let mut metrics = MetricsBuilder::new().insert("wave_summary", &summary);
        if let Some(title) = report.pointer("/statistics/pagetitle").and_then(Value::as_str) {
            metrics = metrics.insert("page_title", title);
        }

        if let Some(summarizer) = &self.summarizer {
            match summarizer.summarize(&report.to_string()).await {
                Ok(text) => metrics = metrics.insert("ai_summary", text),
                Err(e) => {
                    warn!(url = %url, "Accessibility summary failed: {}", e);
                    metrics = metrics.insert("ai_summary_error", e.to_string());
                }
            }
        }

        info!(url = %url, ?summary, "WAVE analysis finished");
        ServiceResult::success(metrics.build(), recommendations)
    }

    fn name(&self) -> &'static str {
        ACCESSIBILITY
    }
}
