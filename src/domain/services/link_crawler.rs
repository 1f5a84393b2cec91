// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::CrawlerSettings;
use crate::engines::traits::{FetchRequest, PageFetcher};
use crate::utils::url_utils::{is_same_site, is_web_scheme, resolve_url, strip_fragment};
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// 不跟随的链接前缀
const SKIPPED_PREFIXES: [&str; 4] = ["#", "mailto:", "javascript:", "tel:"];

/// 链接发现器
pub struct LinkDiscoverer;

impl LinkDiscoverer {
    /// 从HTML内容中提取同站链接
    ///
    /// # 参数
    ///
    /// * `html_content` - HTML内容
    /// * `base` - 页面地址，用于解析相对链接和判断同站
    ///
    /// # 返回值
    ///
    /// 去掉片段标识符并去重后的绝对链接，按字典序排列
    pub fn extract_internal_links(html_content: &str, base: &Url) -> BTreeSet<String> {
        let document = Html::parse_document(html_content);
        let mut links = BTreeSet::new();

        let Ok(selector) = Selector::parse("a[href]") else {
            return links;
        };

        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href").map(str::trim) else {
                continue;
            };
            if href.is_empty() || SKIPPED_PREFIXES.iter().any(|p| href.starts_with(p)) {
                continue;
            }

            if let Ok(url) = resolve_url(base, href) {
                if is_web_scheme(&url) && is_same_site(&url, base) {
                    links.insert(strip_fragment(&url).to_string());
                }
            }
        }

        links
    }
}

/// 全站扫描的链接爬取服务
///
/// 只抓取目标页本身，不递归
pub struct LinkCrawler {
    fetcher: Arc<dyn PageFetcher>,
    settings: CrawlerSettings,
}

impl LinkCrawler {
    pub fn new(fetcher: Arc<dyn PageFetcher>, settings: CrawlerSettings) -> Self {
        Self { fetcher, settings }
    }

    /// 抓取页面并返回其中的同站链接，抓取失败时返回空集合
    pub async fn discover(&self, base: &Url) -> BTreeSet<String> {
        let request = FetchRequest {
            url: base.to_string(),
            timeout: Duration::from_secs(self.settings.timeout_secs),
            render_wait: Duration::from_millis(self.settings.render_wait_ms),
        };

        match self.fetcher.fetch(&request).await {
            Ok(response) => {
                debug!(
                    url = %base,
                    engine = self.fetcher.name(),
                    status = response.status_code,
                    elapsed_ms = response.response_time_ms,
                    "Page fetched for link discovery"
                );
                LinkDiscoverer::extract_internal_links(&response.content, base)
            }
            Err(e) => {
                warn!(url = %base, engine = self.fetcher.name(), "Link discovery failed: {}", e);
                BTreeSet::new()
            }
        }
    }

    /// 全站扫描的页面列表：基础地址在前，其后为发现的链接，最多 `max_pages` 个
    pub async fn pages_for(&self, base: &Url) -> Vec<Url> {
        let base = strip_fragment(base);
        let links = self.discover(&base).await;

        let mut pages = vec![base.clone()];
        pages.extend(
            links
                .iter()
                .filter_map(|link| Url::parse(link).ok())
                .filter(|url| *url != base),
        );
        pages.truncate(self.settings.max_pages.max(1));

        info!(url = %base, discovered = links.len(), pages = pages.len(), "Full scan pages selected");
        pages
    }
}
