// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::{EngineError, FetchRequest, FetchResponse, PageFetcher};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;

// Shared browser instance, launched once and reused across requests.
static BROWSER_INSTANCE: OnceCell<Browser> = OnceCell::const_new();

/// 获取（必要时启动）共享的浏览器实例
///
/// 设置了 `CHROMIUM_REMOTE_DEBUGGING_URL` 时连接远程 Chrome，否则本地启动无头 Chromium
pub async fn get_browser() -> Result<&'static Browser, EngineError> {
    BROWSER_INSTANCE
        .get_or_try_init(|| async {
            let remote_debugging_url = std::env::var("CHROMIUM_REMOTE_DEBUGGING_URL").ok();

            let (browser, mut handler) = if let Some(ref url) = remote_debugging_url {
                tracing::info!("Connecting to remote Chrome instance at: {}", url);
                Browser::connect(url).await.map_err(|e| {
                    EngineError::Browser(format!("Failed to connect to remote Chrome: {}", e))
                })?
            } else {
                let config = BrowserConfig::builder()
                    .no_sandbox()
                    .request_timeout(Duration::from_secs(30))
                    .arg("--disable-gpu")
                    .arg("--disable-dev-shm-usage")
                    .build()
                    .map_err(EngineError::Browser)?;

                Browser::launch(config)
                    .await
                    .map_err(|e| EngineError::Browser(e.to_string()))?
            };

            // Drive browser events until the connection closes
            tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            Ok(browser)
        })
        .await
}

/// 在期限内完成 `work`，超时映射为 `EngineError::Timeout`
async fn within<T, F>(deadline: Duration, work: F) -> Result<T, EngineError>
where
    F: Future<Output = Result<T, EngineError>>,
{
    tokio::time::timeout(deadline, work)
        .await
        .map_err(|_| EngineError::Timeout)?
}

fn browser_error(e: impl std::fmt::Display) -> EngineError {
    EngineError::Browser(e.to_string())
}

/// 导航并等待客户端渲染，返回当前DOM
async fn render(page: &Page, request: &FetchRequest) -> Result<String, EngineError> {
    // goto waits for the load event
    page.goto(&request.url).await.map_err(browser_error)?;

    if !request.render_wait.is_zero() {
        tokio::time::sleep(request.render_wait).await;
    }

    page.content().await.map_err(browser_error)
}

/// 浏览器引擎
///
/// 基于chromiumoxide的无头浏览器渲染，等待客户端渲染后读取DOM
pub struct BrowserEngine;

#[async_trait]
impl PageFetcher for BrowserEngine {
    /// 渲染页面并返回渲染后的HTML
    ///
    /// # 参数
    ///
    /// * `request` - 抓取请求，`render_wait` 为导航完成后的固定等待时间
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchResponse)` - 渲染后的页面
    /// * `Err(EngineError)` - 浏览器错误或超时
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, EngineError> {
        let start = Instant::now();
        let deadline = request.timeout + request.render_wait;

        let page = within(deadline, async {
            let browser = get_browser().await?;
            browser.new_page("about:blank").await.map_err(browser_error)
        })
        .await?;

        let rendered = within(
            deadline.saturating_sub(start.elapsed()),
            render(&page, request),
        )
        .await;

        // The tab is closed whether rendering succeeded, failed or timed out
        if let Err(e) = page.close().await {
            tracing::debug!("Failed to close browser page: {}", e);
        }

        // chromiumoxide does not expose the navigation status here
        Ok(FetchResponse {
            status_code: 200,
            content: rendered?,
            response_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn name(&self) -> &'static str {
        "browser"
    }
}
