// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::crawl::{Crawl, CrawlStatus};
use crate::domain::models::export::ExportFormat;
use crate::infrastructure::results::OutputFile;

/// 爬取状态响应
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrawlStatusDto {
    pub crawl_id: Uuid,
    pub status: CrawlStatus,
    pub url: String,
    pub output_path: String,
    pub error_message: Option<String>,
    pub results_ready: bool,
    pub export_format: ExportFormat,
    pub export_type: String,
    pub config_file: String,
    pub exit_code: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<&Crawl> for CrawlStatusDto {
    fn from(crawl: &Crawl) -> Self {
        Self {
            crawl_id: crawl.id,
            status: crawl.status,
            url: crawl.url.clone(),
            output_path: crawl.output_path.to_string_lossy().into_owned(),
            error_message: crawl.error_message.clone(),
            results_ready: crawl.results_ready,
            export_format: crawl.export_format,
            export_type: crawl.export_type.clone(),
            config_file: crawl.config_file.clone(),
            exit_code: crawl.exit_code,
            created_at: crawl.created_at,
            started_at: crawl.started_at,
            completed_at: crawl.completed_at,
        }
    }
}

/// 爬取列表响应
#[derive(Debug, Serialize, Deserialize)]
pub struct CrawlListDto {
    pub crawls: Vec<CrawlStatusDto>,
}

/// 输出文件列表响应
#[derive(Debug, Serialize)]
pub struct CrawlFilesDto {
    pub crawl_id: Uuid,
    pub output_path: String,
    pub files: Vec<OutputFile>,
}
