// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use uuid::Uuid;

use super::export::ExportFormat;

/// 爬取任务实体
///
/// 表示一次对外部 SEO Spider 的调用，包含请求参数、执行状态、
/// 输出目录以及生命周期时间戳。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Crawl {
    /// 爬取任务唯一标识符
    pub id: Uuid,
    /// 起始URL
    pub url: String,
    /// 当前状态
    pub status: CrawlStatus,
    /// 本次爬取的输出目录
    pub output_path: PathBuf,
    /// 失败或取消原因
    pub error_message: Option<String>,
    /// 结果文件是否可下载
    pub results_ready: bool,
    /// 导出格式
    pub export_format: ExportFormat,
    /// 导出类型，例如 `all_links`、`internal_all`
    pub export_type: String,
    /// 使用的 `.seospider` 配置文件名
    pub config_file: String,
    /// 爬虫进程退出码
    pub exit_code: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// 子进程启动时间
    pub started_at: Option<DateTime<Utc>>,
    /// 进入终止状态的时间
    pub completed_at: Option<DateTime<Utc>>,
}

impl Crawl {
    /// 创建一个处于 `Queued` 状态的新任务
    pub fn new(
        url: String,
        export_format: ExportFormat,
        export_type: String,
        config_file: String,
        output_path: PathBuf,
    ) -> Self {
        Self::with_id(
            Uuid::new_v4(),
            url,
            export_format,
            export_type,
            config_file,
            output_path,
        )
    }

    /// 使用指定ID创建任务，输出目录由调用方决定
    pub fn with_id(
        id: Uuid,
        url: String,
        export_format: ExportFormat,
        export_type: String,
        config_file: String,
        output_path: PathBuf,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            url,
            status: CrawlStatus::Queued,
            output_path,
            error_message: None,
            results_ready: false,
            export_format,
            export_type,
            config_file,
            exit_code: None,
            created_at: now,
            updated_at: now,
            started_at: None,
            completed_at: None,
        }
    }

    pub fn mark_running(&mut self) {
        let now = Utc::now();
        self.status = CrawlStatus::Running;
        self.started_at = Some(now);
        self.updated_at = now;
    }

    pub fn mark_completed(&mut self, exit_code: Option<i32>) {
        self.finish(CrawlStatus::Completed, None);
        self.exit_code = exit_code;
        self.results_ready = true;
    }

    pub fn mark_failed(&mut self, message: impl Into<String>, exit_code: Option<i32>) {
        self.finish(CrawlStatus::Failed, Some(message.into()));
        self.exit_code = exit_code;
    }

    pub fn mark_cancelled(&mut self, message: impl Into<String>) {
        self.finish(CrawlStatus::Cancelled, Some(message.into()));
    }

    fn finish(&mut self, status: CrawlStatus, error_message: Option<String>) {
        let now = Utc::now();
        self.status = status;
        self.error_message = error_message;
        self.results_ready = false;
        self.updated_at = now;
        self.completed_at = Some(now);
    }
}

/// 爬取状态枚举
///
/// 状态转换遵循以下流程：
/// Queued → Running → Completed/Failed/Cancelled
///
/// Queued 表示任务正在等待并发名额，Running 表示爬虫子进程已经启动。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CrawlStatus {
    /// 已入队
    #[default]
    Queued,
    /// 运行中
    Running,
    /// 已完成
    Completed,
    /// 已失败
    Failed,
    /// 已取消
    Cancelled,
}

impl CrawlStatus {
    /// 是否为终止状态
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CrawlStatus::Completed | CrawlStatus::Failed | CrawlStatus::Cancelled
        )
    }
}

impl fmt::Display for CrawlStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CrawlStatus::Queued => write!(f, "queued"),
            CrawlStatus::Running => write!(f, "running"),
            CrawlStatus::Completed => write!(f, "completed"),
            CrawlStatus::Failed => write!(f, "failed"),
            CrawlStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for CrawlStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(CrawlStatus::Queued),
            "running" => Ok(CrawlStatus::Running),
            "completed" => Ok(CrawlStatus::Completed),
            "failed" => Ok(CrawlStatus::Failed),
            "cancelled" => Ok(CrawlStatus::Cancelled),
            _ => Err(()),
        }
    }
}
