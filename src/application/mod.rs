// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 负责请求校验以及分析流程的编排，业务规则位于领域层
pub mod dto;
pub mod use_cases;
