// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// - 领域模型（models）：扫描请求、服务结果与汇总报告
/// - 服务（services）：各项分析、链接爬取与结果汇总
///
/// 领域层只依赖抽象的出站客户端与抓取引擎。
pub mod models;
pub mod services;
