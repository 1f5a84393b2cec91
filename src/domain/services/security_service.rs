// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::SecuritySettings;
use crate::domain::models::report::SECURITY;
use crate::domain::models::service_result::{MetricsBuilder, ServiceResult};
use crate::domain::services::analyzer::Analyzer;
use crate::infrastructure::http_client::{HttpClientError, RetryClient};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

const NOT_AVAILABLE: &str = "N/A";

/// SSL Labs `analyze` 响应中用到的字段
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HostAssessment {
    pub status: Option<String>,
    pub status_message: Option<String>,
    pub endpoints: Vec<Endpoint>,
}

impl HostAssessment {
    fn is_finished(&self) -> bool {
        matches!(self.status.as_deref(), Some("READY") | Some("ERROR"))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Endpoint {
    pub ip_address: Option<String>,
    pub server_name: Option<String>,
    pub status_message: Option<String>,
    pub grade: Option<String>,
    pub has_warnings: Option<bool>,
    pub details: EndpointDetails,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EndpointDetails {
    pub forward_secrecy: Option<i64>,
    pub supports_rc4: Option<bool>,
    pub hsts_policy: HstsPolicy,
    pub cert: Certificate,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HstsPolicy {
    pub status: Option<String>,
    pub long_max_age: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Certificate {
    /// 问题位掩码（旧版本API中可能为列表）
    pub issues: Value,
    pub not_after: Value,
}

/// 输出到结果中的端点摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointInfo {
    pub ip_address: String,
    pub grade: String,
    pub server_name: String,
    pub status_message: String,
}

fn or_na(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// 根据第一个端点的检测结果生成建议
pub fn evaluate_endpoint(endpoint: &Endpoint) -> Vec<String> {
    let details = &endpoint.details;
    let mut recs = Vec::new();

    if let Some(grade @ ("A+" | "A")) = endpoint.grade.as_deref() {
        recs.push(format!(
            "Site has a strong SSL/TLS configuration with a grade of {}.",
            grade
        ));
    }
    if details.forward_secrecy == Some(2) {
        recs.push(
            "Ensure continued support for Forward Secrecy across all modern browsers.".to_string(),
        );
    }
    if !details.supports_rc4.unwrap_or(false) {
        recs.push("RC4 cipher is disabled, which is recommended.".to_string());
    }
    if details.hsts_policy.status.as_deref() == Some("present") {
        recs.push("HSTS is enabled.".to_string());
        if details.hsts_policy.long_max_age.unwrap_or(false) {
            recs.push(
                "HSTS max-age is sufficiently long for preloading (helps maintain A+).".to_string(),
            );
        }
    }
    if !is_truthy(&details.cert.issues) {
        recs.push("Certificate chain is complete and valid.".to_string());
    }
    if is_truthy(&details.cert.not_after) {
        recs.push("Certificate is valid and not expired.".to_string());
    }
    if endpoint.has_warnings.unwrap_or(false) {
        recs.push("Review non-fatal SSL warnings for further improvement.".to_string());
    }

    if recs.is_empty() {
        recs.push(
            "No specific recommendations. SSL Labs scan returned no major findings.".to_string(),
        );
    }
    recs
}

/// 基于 SSL Labs 的TLS配置分析
pub struct SecurityService {
    client: Arc<RetryClient>,
    settings: SecuritySettings,
}

impl SecurityService {
    pub fn new(client: Arc<RetryClient>, settings: SecuritySettings) -> Self {
        Self { client, settings }
    }

    fn analyze_url(&self) -> String {
        format!("{}/analyze", self.settings.base_url.trim_end_matches('/'))
    }

    async fn fetch_assessment(
        &self,
        query: &[(&str, &str)],
    ) -> Result<HostAssessment, HttpClientError> {
        let response = self.client.get(SECURITY, &self.analyze_url(), query).await?;
        Ok(response.json::<HostAssessment>().await?)
    }

    /// 启动评估并轮询直到就绪或次数耗尽
    ///
    /// 未就绪时返回最后一次轮询的结果
    async fn assess(&self, host: &str) -> Result<HostAssessment, HttpClientError> {
        self.client
            .get(
                SECURITY,
                &self.analyze_url(),
                &[("host", host), ("publish", "off"), ("all", "done")],
            )
            .await?;

        let interval = Duration::from_millis(self.settings.poll_interval_ms);
        let max_polls = self.settings.max_polls.max(1);
        let mut assessment = HostAssessment::default();

        for poll in 1..=max_polls {
            assessment = self
                .fetch_assessment(&[("host", host), ("fromCache", "on")])
                .await?;
            debug!(host, poll, status = ?assessment.status, "SSL Labs poll");

            if assessment.is_finished() {
                break;
            }
            if poll < max_polls {
                tokio::time::sleep(interval).await;
            }
        }

        if !assessment.is_finished() {
            warn!(host, max_polls, status = ?assessment.status, "SSL Labs assessment not ready, using last status");
        }
        Ok(assessment)
    }
}

#[async_trait]
impl Analyzer for SecurityService {
    async fn analyze(&self, url: &Url) -> ServiceResult {
        let Some(host) = url.host_str() else {
            return ServiceResult::failure("SSL Labs API error: URL has no host");
        };

        let assessment = match self.assess(host).await {
            Ok(assessment) => assessment,
            Err(e) => {
                warn!(host, "SSL Labs request failed: {}", e);
                return ServiceResult::failure(format!("SSL Labs API error: {}", e));
            }
        };

        let Some(endpoint) = assessment.endpoints.first() else {
            return ServiceResult::failure("No endpoints found from SSL Labs");
        };

        let grade = or_na(&endpoint.grade);
        let info = EndpointInfo {
            ip_address: or_na(&endpoint.ip_address),
            grade: grade.clone(),
            server_name: or_na(&endpoint.server_name),
            status_message: or_na(&endpoint.status_message),
        };
        let recommendations = evaluate_endpoint(endpoint);
        info!(host, grade = %grade, "SSL Labs assessment finished");

        let metrics = MetricsBuilder::new()
            .insert("ssllabs_grade", &grade)
            .insert("assessment_status", or_na(&assessment.status))
            .insert("endpoint_info", &info)
            .build();
        ServiceResult::success(metrics, recommendations)
    }

    fn name(&self) -> &'static str {
        SECURITY
    }
}
