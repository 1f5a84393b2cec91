// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{ParseError, Url};

/// 将可能为相对路径的URL转换为绝对路径URL
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url, ParseError> {
    base_url.join(path)
}

/// 解析面向 Web 的绝对 URL（仅 http/https 且包含主机名）
pub fn parse_web_url(raw: &str) -> Option<Url> {
    let parsed = Url::parse(raw.trim()).ok()?;
    if !is_web_scheme(&parsed) || parsed.host_str().is_none() {
        return None;
    }
    Some(parsed)
}

pub fn is_web_scheme(url: &Url) -> bool {
    url.scheme() == "http" || url.scheme() == "https"
}

/// 判断两个 URL 是否属于同一站点（主机名与端口一致）
pub fn is_same_site(a: &Url, b: &Url) -> bool {
    a.host_str() == b.host_str() && a.port_or_known_default() == b.port_or_known_default()
}

/// 去掉 URL 的片段标识符
pub fn strip_fragment(url: &Url) -> Url {
    let mut clean = url.clone();
    clean.set_fragment(None);
    clean
}
