// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含服务器、出站HTTP、各外部分析服务以及爬虫等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 出站HTTP与重试配置
    pub http: HttpSettings,
    /// PageSpeed Insights 配置
    pub pagespeed: PageSpeedSettings,
    /// 可访问性分析配置
    pub accessibility: AccessibilitySettings,
    /// 本地文本摘要子进程配置
    pub summarizer: SummarizerSettings,
    /// SSL Labs 配置
    pub security: SecuritySettings,
    /// 站内链接爬取配置
    pub crawler: CrawlerSettings,
    /// Prometheus 指标配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
    /// 允许跨域访问的来源
    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,
}

/// 出站HTTP配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    /// 单次请求超时时间（秒）
    pub timeout_secs: u64,
    /// User-Agent 请求头
    pub user_agent: String,
    /// 最大尝试次数（包含首次请求）
    pub max_attempts: u32,
    /// 初始退避时间（毫秒）
    pub initial_backoff_ms: u64,
    /// 退避乘数
    pub backoff_multiplier: f64,
    /// 最大退避时间（毫秒）
    pub max_backoff_ms: u64,
    /// 是否启用抖动
    pub enable_jitter: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageSpeedSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub locale: String,
    #[serde(default = "default_pagespeed_categories")]
    pub categories: Vec<String>,
}

/// 可访问性分析模式
///
/// 每个部署只选择一种模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessibilityMode {
    /// 直接解析页面HTML
    Html,
    /// 委托给 WAVE API
    Wave,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccessibilitySettings {
    pub mode: AccessibilityMode,
    pub wave_base_url: String,
    pub wave_api_key: Option<String>,
    pub wave_report_type: u8,
}

/// 本地文本生成子进程配置
#[derive(Debug, Clone, Deserialize)]
pub struct SummarizerSettings {
    /// 是否启用摘要
    pub enabled: bool,
    /// 可执行文件
    pub command: String,
    /// 可执行文件参数（提示词经标准输入传入）
    #[serde(default = "default_summarizer_args")]
    pub args: Vec<String>,
    /// 超时时间（秒）
    pub timeout_secs: u64,
    /// 摘要最大词数
    pub max_words: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecuritySettings {
    pub base_url: String,
    pub max_polls: u32,
    pub poll_interval_ms: u64,
}

/// 页面抓取方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlerMode {
    /// 普通HTTP GET
    Fetch,
    /// 无头浏览器渲染
    Browser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerSettings {
    pub mode: CrawlerMode,
    pub timeout_secs: u64,
    /// 浏览器渲染后的等待时间（毫秒）
    pub render_wait_ms: u64,
    /// 全站扫描的最大页面数
    pub max_pages: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    pub enabled: bool,
    pub listen_address: String,
}

fn default_cors_origins() -> Vec<String> {
    vec!["https://auto-ux.vercel.app".to_string()]
}

fn default_pagespeed_categories() -> Vec<String> {
    ["performance", "accessibility", "best-practices", "seo"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

fn default_summarizer_args() -> Vec<String> {
    vec!["run".to_string(), "llama3".to_string()]
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、`config/default`、`config/{APP_ENVIRONMENT}` 以及
    /// `UXAUDIT__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Server
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            // Outbound HTTP
            .set_default("http.timeout_secs", 120)?
            .set_default("http.user_agent", "UIUXAnalyzer/1.0")?
            .set_default("http.max_attempts", 3)?
            .set_default("http.initial_backoff_ms", 1000)?
            .set_default("http.backoff_multiplier", 2.0)?
            .set_default("http.max_backoff_ms", 60_000)?
            .set_default("http.enable_jitter", false)?
            // PageSpeed Insights
            .set_default(
                "pagespeed.base_url",
                "https://www.googleapis.com/pagespeedonline/v5/runPagespeed",
            )?
            .set_default("pagespeed.locale", "en_US")?
            // Accessibility
            .set_default("accessibility.mode", "html")?
            .set_default("accessibility.wave_base_url", "https://wave.webaim.org/api/request")?
            .set_default("accessibility.wave_report_type", 2)?
            // Summarizer
            .set_default("summarizer.enabled", false)?
            .set_default("summarizer.command", "ollama")?
            .set_default("summarizer.timeout_secs", 60)?
            .set_default("summarizer.max_words", 30)?
            // SSL Labs
            .set_default("security.base_url", "https://api.ssllabs.com/api/v3")?
            .set_default("security.max_polls", 15)?
            .set_default("security.poll_interval_ms", 5000)?
            // Crawler
            .set_default("crawler.mode", "fetch")?
            .set_default("crawler.timeout_secs", 30)?
            .set_default("crawler.render_wait_ms", 3000)?
            .set_default("crawler.max_pages", 50)?
            // Metrics
            .set_default("metrics.enabled", true)?
            .set_default("metrics.listen_address", "0.0.0.0:9000")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("UXAUDIT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_allowed_origins")
                    .with_list_parse_key("pagespeed.categories")
                    .with_list_parse_key("summarizer.args"),
            );

        builder.build()?.try_deserialize()
    }
}
