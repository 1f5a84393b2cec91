// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::SummarizerSettings;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// 摘要生成错误
#[derive(Error, Debug)]
pub enum SummarizerError {
    #[error("Summarizer executable '{0}' not found")]
    NotFound(String),

    #[error("Summarizer exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("Summarizer timed out after {0}s")]
    Timeout(u64),

    #[error("Summarizer I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait TextSummarizer: Send + Sync {
    async fn summarize(&self, report: &str) -> Result<String, SummarizerError>;
}

/// 通过本地命令行模型生成摘要，默认 `ollama run llama3`
pub struct CommandSummarizer {
    settings: SummarizerSettings,
}

impl CommandSummarizer {
    pub fn new(settings: SummarizerSettings) -> Self {
        Self { settings }
    }

    fn prompt(&self, report: &str) -> String {
        format!(
            "Summarize the following accessibility report in at most {} words, \
             focusing on the most important issues for a non-technical reader:\n\n{}",
            self.settings.max_words, report
        )
    }
}

/// 截断到最多 `max_words` 个词
pub fn truncate_words(text: &str, max_words: usize) -> String {
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl TextSummarizer for CommandSummarizer {
    async fn summarize(&self, report: &str) -> Result<String, SummarizerError> {
        let command = &self.settings.command;
        let timeout = self.settings.timeout_secs;

        let mut child = Command::new(command)
            .args(&self.settings.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => SummarizerError::NotFound(command.clone()),
                _ => SummarizerError::Io(e),
            })?;

        // 报告可能超出命令行长度限制，提示词经 stdin 传入
        let stdin = child.stdin.take();
        let prompt = self.prompt(report);
        let feed = async move {
            let Some(mut stdin) = stdin else {
                return Ok(());
            };
            match stdin.write_all(prompt.as_bytes()).await {
                // 子进程可以不读取输入直接退出
                Err(e) if e.kind() != ErrorKind::BrokenPipe => Err(e),
                _ => Ok(()),
            }
        };
        let run = async {
            let (fed, output) = tokio::join!(feed, child.wait_with_output());
            fed?;
            output
        };

        let output = tokio::time::timeout(Duration::from_secs(timeout), run)
            .await
            .map_err(|_| SummarizerError::Timeout(timeout))??;

        if !output.status.success() {
            return Err(SummarizerError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let summary = truncate_words(stdout.trim(), self.settings.max_words);
        debug!(command = %command, words = summary.split_whitespace().count(), "Summary generated");
        Ok(summary)
    }
}
