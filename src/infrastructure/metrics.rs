// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MetricsSettings;
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 初始化指标系统
///
/// 启动 Prometheus 导出器并注册各类监控指标。地址非法或端口被占用时只记录警告。
pub fn init_metrics(settings: &MetricsSettings) {
    if !settings.enabled {
        info!("Metrics exporter disabled");
        return;
    }

    let addr: SocketAddr = match settings.listen_address.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!(
                "Invalid metrics listen address {}: {}",
                settings.listen_address, e
            );
            return;
        }
    };

    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return;
    }

    describe_counter!(
        "external_requests_total",
        "Total number of outbound requests to analysis services, including retries"
    );
    describe_counter!(
        "external_request_retries_total",
        "Total number of retried outbound requests"
    );
    describe_histogram!(
        "analysis_duration_seconds",
        "Duration of a single analyzer run in seconds"
    );
    describe_counter!("pages_scanned_total", "Total number of analyzed pages");

    info!("Metrics exporter listening on {}", addr);
}
