// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::engines::traits::{EngineError, FetchRequest, FetchResponse, PageFetcher};
use async_trait::async_trait;
use std::time::Instant;

/// 抓取引擎
///
/// 基于reqwest实现的普通HTTP GET，不重试、不检查状态码
pub struct FetchEngine {
    user_agent: String,
}

impl FetchEngine {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }
}

#[async_trait]
impl PageFetcher for FetchEngine {
    /// 执行HTTP抓取
    ///
    /// # 参数
    ///
    /// * `request` - 抓取请求
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchResponse)` - 抓取响应（包括非 2xx 状态）
    /// * `Err(EngineError)` - 连接失败或超时
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, EngineError> {
        let client = reqwest::Client::builder()
            .user_agent(self.user_agent.clone())
            .timeout(request.timeout)
            .build()?;

        let start = Instant::now();
        let response = client.get(&request.url).send().await?;
        let status_code = response.status().as_u16();
        let content = response.text().await?;

        Ok(FetchResponse {
            status_code,
            content,
            response_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn name(&self) -> &'static str {
        "fetch"
    }
}
