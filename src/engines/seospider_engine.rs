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

use crate::config::settings::CrawlerSettings;
use crate::engines::traits::{CrawlEngine, CrawlJob, CrawlOutcome, EngineError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::ffi::OsString;
use std::process::Stdio;
use std::time::Duration;
use tokio::fs;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// SEO Spider 命令行引擎
///
/// 以 headless 模式启动外部爬虫进程，把结果导出到任务的输出目录。
pub struct SeoSpiderEngine {
    binary: String,
    extra_args: Vec<String>,
    timeout: Option<Duration>,
    stderr_tail_lines: usize,
}

impl SeoSpiderEngine {
    pub fn new(settings: &CrawlerSettings) -> Self {
        Self {
            binary: settings.binary.clone(),
            extra_args: settings.extra_args.clone(),
            timeout: settings.timeout(),
            stderr_tail_lines: settings.stderr_tail_lines,
        }
    }

    /// 构建爬虫命令行参数（不含可执行文件本身）
    pub fn build_args(&self, job: &CrawlJob) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--crawl".into(),
            job.url.clone().into(),
            "--headless".into(),
            "--output-folder".into(),
            job.output_dir.clone().into_os_string(),
            "--timestamped-output".into(),
            "--accepteula".into(),
        ];

        if let Some(config_path) = &job.config_path {
            args.push("--config".into());
            args.push(config_path.clone().into_os_string());
        }

        args.push(job.export_format.cli_flag().into());
        args.push(job.export_type.clone().into());

        args.extend(self.extra_args.iter().map(OsString::from));
        args
    }
}

#[async_trait]
impl CrawlEngine for SeoSpiderEngine {
    /// 执行爬取
    ///
    /// stdout 按行写入 debug 日志，stderr 只保留末尾若干行。
    /// 超时或 future 被丢弃时子进程会被终止。
    async fn run(&self, job: &CrawlJob) -> Result<CrawlOutcome, EngineError> {
        fs::create_dir_all(&job.output_dir).await?;

        let args = self.build_args(job);
        info!(crawl_id = %job.crawl_id, binary = %self.binary, "Spawning crawler");
        debug!(crawl_id = %job.crawl_id, ?args, "Crawler arguments");

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| EngineError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let crawl_id = job.crawl_id;
        let tail_lines = self.stderr_tail_lines;

        let stdout_task = async move {
            if let Some(out) = stdout {
                let mut reader = BufReader::new(out);
                let mut buf = Vec::new();
                while let Some(line) = next_lossy_line(&mut reader, &mut buf).await? {
                    debug!(crawl_id = %crawl_id, "{}", line);
                }
            }
            Ok::<(), std::io::Error>(())
        };

        let stderr_task = async move {
            let mut tail = VecDeque::with_capacity(tail_lines);
            if let Some(err) = stderr {
                let mut reader = BufReader::new(err);
                let mut buf = Vec::new();
                while let Some(line) = next_lossy_line(&mut reader, &mut buf).await? {
                    debug!(crawl_id = %crawl_id, stream = "stderr", "{}", line);
                    if tail_lines == 0 {
                        continue;
                    }
                    if tail.len() == tail_lines {
                        tail.pop_front();
                    }
                    tail.push_back(line);
                }
            }
            Ok::<VecDeque<String>, std::io::Error>(tail)
        };

        let run = async { tokio::try_join!(child.wait(), stdout_task, stderr_task) };
        let waited = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, run).await.ok(),
            None => Some(run.await),
        };

        let Some(result) = waited else {
            if let Err(e) = child.kill().await {
                warn!(crawl_id = %crawl_id, "Failed to kill timed out crawler: {}", e);
            }
            return Err(EngineError::Timeout(self.timeout.unwrap_or_default()));
        };

        let (status, (), tail) = result?;
        Ok(CrawlOutcome {
            success: status.success(),
            exit_code: status.code(),
            stderr_tail: tail.into_iter().collect::<Vec<_>>().join("\n"),
        })
    }

    fn name(&self) -> &'static str {
        "seospider"
    }
}

/// 读取一行输出，非 UTF-8 字节按替换字符处理
async fn next_lossy_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    if reader.read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(buf);
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}
