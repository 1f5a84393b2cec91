// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 可访问性分析（accessibility_service）：HTML检查或 WAVE API
/// - 性能分析（performance_service）：PageSpeed Insights 移动端与桌面端
/// - 安全分析（security_service）：SSL Labs 评估与轮询
/// - 摘要生成（summary_service）：调用本地文本生成程序
/// - 链接爬取（link_crawler）：全站扫描的同站链接发现
/// - 汇总（aggregator）：按服务归类建议
pub mod accessibility_service;
pub mod aggregator;
pub mod analyzer;
pub mod link_crawler;
pub mod performance_service;
pub mod security_service;
pub mod summary_service;
