// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::HttpSettings;
use crate::utils::retry_policy::RetryPolicy;
use reqwest::{Method, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// 出站HTTP错误类型
#[derive(Error, Debug)]
pub enum HttpClientError {
    /// 请求失败（连接、超时或非成功状态码）
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

impl HttpClientError {
    /// 判断错误是否可重试
    ///
    /// 连接错误、超时、5xx 与 429 视为临时性故障
    pub fn is_retryable(&self) -> bool {
        match self {
            HttpClientError::RequestFailed(e) => {
                if let Some(status) = e.status() {
                    return status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS;
                }
                e.is_timeout() || e.is_connect() || e.is_request()
            }
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpClientError::RequestFailed(e) => e.status(),
        }
    }
}

/// 带重试的HTTP客户端
///
/// 所有外部分析服务的调用都经过这里：统一的 User-Agent、超时以及指数退避重试
pub struct RetryClient {
    client: reqwest::Client,
    policy: RetryPolicy,
}

impl RetryClient {
    /// 根据配置创建客户端
    ///
    /// # 参数
    ///
    /// * `settings` - 出站HTTP配置
    ///
    /// # 返回值
    ///
    /// * `Ok(RetryClient)` - 客户端实例
    /// * `Err(HttpClientError)` - 底层客户端构建失败
    pub fn new(settings: &HttpSettings) -> Result<Self, HttpClientError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            policy: RetryPolicy::from(settings),
        })
    }

    pub fn with_policy(client: reqwest::Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// 发送请求，失败时按策略重试
    ///
    /// # 参数
    ///
    /// * `service` - 调用方服务名，用于日志和指标
    /// * `method` - HTTP方法
    /// * `url` - 目标地址
    /// * `query` - 查询参数（允许重复的键）
    /// * `body` - 可选的JSON请求体
    ///
    /// # 返回值
    ///
    /// * `Ok(Response)` - 状态码为成功的响应
    /// * `Err(HttpClientError)` - 不可重试的错误，或重试耗尽后的最后一个错误
    pub async fn request(
        &self,
        service: &'static str,
        method: Method,
        url: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Response, HttpClientError> {
        let mut attempt: u32 = 1;

        loop {
            metrics::counter!("external_requests_total", "service" => service).increment(1);

            let mut builder = self.client.request(method.clone(), url).query(query);
            if let Some(body) = body {
                builder = builder.json(body);
            }

            // Strip the URL from errors: query strings may carry API keys.
            let result = builder
                .send()
                .await
                .and_then(|response| response.error_for_status())
                .map_err(|e| HttpClientError::from(e.without_url()));

            match result {
                Ok(response) => {
                    debug!(service, attempt, status = %response.status(), "External request succeeded");
                    return Ok(response);
                }
                Err(err) => {
                    if !err.is_retryable() || !self.policy.should_retry(attempt) {
                        warn!(service, attempt, error = %err, "External request failed");
                        return Err(err);
                    }

                    let backoff = self.policy.calculate_backoff(attempt);
                    warn!(
                        service,
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %err,
                        "External request failed, retrying"
                    );
                    metrics::counter!("external_request_retries_total", "service" => service)
                        .increment(1);

                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
            }
        }
    }

    /// GET 请求的便捷封装
    pub async fn get(
        &self,
        service: &'static str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Response, HttpClientError> {
        self.request(service, Method::GET, url, query, None).await
    }

    /// GET 请求并将响应体解析为JSON
    pub async fn get_json(
        &self,
        service: &'static str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, HttpClientError> {
        let response = self.get(service, url, query).await?;
        Ok(response.json::<Value>().await?)
    }
}
