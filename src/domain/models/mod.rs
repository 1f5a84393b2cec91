// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心数据结构，包括：
/// - 扫描请求（scan_request）：经过校验的待分析页面及分析开关
/// - 服务结果（service_result）：单个外部分析服务的指标与建议
/// - 报告（report）：按服务归类的汇总报告
///
/// 所有模型都只存活于单个请求的生命周期内。
pub mod report;
pub mod scan_request;
pub mod service_result;
