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

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::export::ExportFormat;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 无法启动爬虫进程
    #[error("Failed to start crawler '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },
    /// 运行过程中的IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 超时
    #[error("Crawl timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

/// 一次爬取调用所需的全部参数
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlJob {
    /// 爬取任务ID
    pub crawl_id: Uuid,
    /// 起始URL
    pub url: String,
    /// 输出目录
    pub output_dir: PathBuf,
    /// 已解析的配置文件路径
    pub config_path: Option<PathBuf>,
    /// 导出格式
    pub export_format: ExportFormat,
    /// 导出类型
    pub export_type: String,
}

/// 爬虫运行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOutcome {
    /// 进程是否以 0 退出
    pub success: bool,
    /// 退出码，被信号终止时为空
    pub exit_code: Option<i32>,
    /// stderr 的最后若干行
    pub stderr_tail: String,
}

impl CrawlOutcome {
    /// 生成失败描述，优先使用 stderr 内容
    pub fn failure_message(&self) -> String {
        if !self.stderr_tail.trim().is_empty() {
            return self.stderr_tail.clone();
        }
        match self.exit_code {
            Some(code) => format!("crawler exited with status {}", code),
            None => "crawler terminated by signal".to_string(),
        }
    }
}

/// 爬取引擎特质
///
/// 负责把 `CrawlJob` 交给具体的爬虫执行。实现必须保证
/// future 被丢弃时终止底层进程。
#[async_trait]
pub trait CrawlEngine: Send + Sync {
    /// 执行爬取
    async fn run(&self, job: &CrawlJob) -> Result<CrawlOutcome, EngineError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
