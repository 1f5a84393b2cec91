// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::Url;

/// 经过校验的扫描请求
///
/// `url` 一定是带主机名的 http/https 绝对地址
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRequest {
    pub url: Url,
    pub run_accessibility: bool,
    pub run_performance: bool,
    pub run_security: bool,
}

impl ScanRequest {
    /// 以相同的分析开关扫描另一个页面
    pub fn for_page(&self, url: Url) -> Self {
        Self {
            url,
            ..self.clone()
        }
    }

    pub fn runs_nothing(&self) -> bool {
        !self.run_accessibility && !self.run_performance && !self.run_security
    }
}
