// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scan_request::ScanRequest;
use crate::utils::url_utils::parse_web_url;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

fn default_true() -> bool {
    true
}

fn validate_web_url(url: &str) -> Result<(), ValidationError> {
    if parse_web_url(url).is_some() {
        Ok(())
    } else {
        Err(ValidationError::new("web_url")
            .with_message("url must be an absolute http or https URL with a host".into()))
    }
}

/// 分析请求，`/v1/analyze` 与 `/v1/full-scan` 共用
///
/// 各项分析开关缺省为开启
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct AnalyzeRequestDto {
    #[validate(url, custom(function = "validate_web_url"))]
    pub url: String,
    #[serde(default = "default_true")]
    pub is_accessibility_applied: bool,
    #[serde(default = "default_true")]
    pub is_pagespeed_applied: bool,
    #[serde(default = "default_true")]
    pub is_security_applied: bool,
}

impl AnalyzeRequestDto {
    /// 转换为领域请求，地址不合法时返回 `None`
    ///
    /// 调用前应先执行 `validate()`
    pub fn to_scan_request(&self) -> Option<ScanRequest> {
        Some(ScanRequest {
            url: parse_web_url(&self.url)?,
            run_accessibility: self.is_accessibility_applied,
            run_performance: self.is_pagespeed_applied,
            run_security: self.is_security_applied,
        })
    }
}
