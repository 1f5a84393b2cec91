// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 单个分析服务的结果
///
/// 指标在序列化时会被展开到与 `recommendations` 同级，
/// 与外部 API 返回的扁平结构保持一致。创建后不再修改。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceResult {
    /// 命名指标
    #[serde(flatten)]
    pub metrics: Map<String, Value>,
    /// 按顺序排列的建议
    #[serde(default)]
    pub recommendations: Vec<String>,
    /// 服务调用失败时的错误信息
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceResult {
    /// 创建成功结果
    pub fn success(metrics: Map<String, Value>, recommendations: Vec<String>) -> Self {
        Self {
            metrics,
            recommendations,
            error: None,
        }
    }

    /// 创建失败结果
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            metrics: Map::new(),
            recommendations: Vec::new(),
            error: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn metric(&self, key: &str) -> Option<&Value> {
        self.metrics.get(key)
    }
}

/// 构造指标映射的小工具
#[derive(Debug, Default)]
pub struct MetricsBuilder {
    metrics: Map<String, Value>,
}

impl MetricsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入一个可序列化的指标，序列化失败时记为 null
    pub fn insert<T: Serialize>(mut self, key: &str, value: T) -> Self {
        self.metrics
            .insert(key.to_string(), serde_json::to_value(value).unwrap_or_default());
        self
    }

    pub fn build(self) -> Map<String, Value> {
        self.metrics
    }
}
