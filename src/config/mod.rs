// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理服务器、出站HTTP、各分析服务、爬取与指标的配置
pub mod settings;
