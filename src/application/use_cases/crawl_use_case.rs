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

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::fs;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    application::dto::crawl_request::CrawlRequestDto,
    domain::{
        models::{
            crawl::{Crawl, CrawlStatus},
            export::{ExportFormat, InvalidExportFormat},
        },
        repositories::{
            config_repository::{ConfigRepository, StorageError},
            crawl_repository::{CrawlRepository, RepositoryError},
        },
    },
    engines::traits::CrawlJob,
    infrastructure::{
        observability::metrics,
        results::{self, OutputFile},
    },
    workers::manager::CrawlManager,
};

/// 客户端取消任务时记录的原因
pub const CANCELLED_BY_CLIENT: &str = "cancelled by client";

#[derive(Error, Debug)]
pub enum CrawlUseCaseError {
    #[error("{0}")]
    Validation(String),
    #[error("Crawl ID not found.")]
    NotFound,
    #[error("Crawl not yet completed or failed.")]
    NotReady,
    #[error("Output directory not found for completed crawl.")]
    OutputMissing,
    #[error("No {ext} results found in {dir}. Make sure export_type is correct.")]
    NoResults { ext: &'static str, dir: String },
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 可供下载的结果文件
#[derive(Debug, Clone, PartialEq)]
pub struct ResultFile {
    pub path: PathBuf,
    pub file_name: String,
    pub media_type: &'static str,
}

/// 解析路径中的爬取ID，格式错误与不存在同样处理
pub fn parse_crawl_id(raw: &str) -> Result<Uuid, CrawlUseCaseError> {
    Uuid::parse_str(raw).map_err(|_| CrawlUseCaseError::NotFound)
}

pub struct CrawlUseCase<CR, CS>
where
    CR: CrawlRepository + 'static,
    CS: ConfigRepository + 'static,
{
    crawl_repo: Arc<CR>,
    config_repo: Arc<CS>,
    manager: Arc<CrawlManager<CR>>,
    crawl_data_dir: PathBuf,
    default_config_file: String,
}

impl<CR, CS> CrawlUseCase<CR, CS>
where
    CR: CrawlRepository + 'static,
    CS: ConfigRepository + 'static,
{
    pub fn new(
        crawl_repo: Arc<CR>,
        config_repo: Arc<CS>,
        manager: Arc<CrawlManager<CR>>,
        crawl_data_dir: impl Into<PathBuf>,
        default_config_file: impl Into<String>,
    ) -> Self {
        Self {
            crawl_repo,
            config_repo,
            manager,
            crawl_data_dir: crawl_data_dir.into(),
            default_config_file: default_config_file.into(),
        }
    }

    /// 校验请求、登记任务并交给后台执行
    pub async fn create_crawl(&self, dto: CrawlRequestDto) -> Result<Crawl, CrawlUseCaseError> {
        dto.validate()
            .map_err(|e| CrawlUseCaseError::Validation(e.to_string()))?;

        let export_format: ExportFormat = dto
            .export_format
            .parse()
            .map_err(|e: InvalidExportFormat| {
                CrawlUseCaseError::Validation(e.to_string())
            })?;

        let config_file = dto
            .config_file
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.default_config_file.clone());
        let config_path = self.resolve_config(&config_file).await?;

        let id = Uuid::new_v4();
        let crawl = Crawl::with_id(
            id,
            dto.url,
            export_format,
            dto.export_type,
            config_file,
            self.crawl_data_dir.join(id.to_string()),
        );
        self.crawl_repo.create(&crawl).await?;
        metrics::record_submitted();

        self.manager.dispatch(CrawlJob {
            crawl_id: crawl.id,
            url: crawl.url.clone(),
            output_dir: crawl.output_path.clone(),
            config_path,
            export_format: crawl.export_format,
            export_type: crawl.export_type.clone(),
        });

        info!(crawl_id = %crawl.id, url = %crawl.url, "Crawl submitted");
        Ok(crawl)
    }

    /// 默认配置文件不存在时不传 `--config`，其他配置文件必须存在
    async fn resolve_config(&self, name: &str) -> Result<Option<PathBuf>, CrawlUseCaseError> {
        let not_found = || CrawlUseCaseError::Validation(format!("Config file '{}' not found.", name));
        match self.config_repo.resolve(name).await {
            Ok(Some(path)) => Ok(Some(path)),
            Ok(None) if name == self.default_config_file => Ok(None),
            Ok(None) | Err(StorageError::InvalidName(_)) => Err(not_found()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_crawl(&self, crawl_id: Uuid) -> Result<Crawl, CrawlUseCaseError> {
        self.crawl_repo
            .find_by_id(crawl_id)
            .await?
            .ok_or(CrawlUseCaseError::NotFound)
    }

    pub async fn list_crawls(&self) -> Result<Vec<Crawl>, CrawlUseCaseError> {
        Ok(self.crawl_repo.list().await?)
    }

    /// 定位已完成任务的主结果文件
    pub async fn get_result_file(&self, crawl_id: Uuid) -> Result<ResultFile, CrawlUseCaseError> {
        let crawl = self.get_crawl(crawl_id).await?;
        if crawl.status != CrawlStatus::Completed || !crawl.results_ready {
            return Err(CrawlUseCaseError::NotReady);
        }

        let is_dir = fs::metadata(&crawl.output_path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(CrawlUseCaseError::OutputMissing);
        }

        let found =
            results::find_result_file(&crawl.output_path, &crawl.export_type, crawl.export_format)
                .await?;

        let path = found.ok_or_else(|| CrawlUseCaseError::NoResults {
            ext: crawl.export_format.extension(),
            dir: crawl.output_path.display().to_string(),
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{}.{}", crawl.export_type, crawl.export_format.extension()));

        Ok(ResultFile {
            path,
            file_name,
            media_type: crawl.export_format.media_type(),
        })
    }

    /// 列出任务输出目录中的文件，目录尚未创建时返回空列表
    pub async fn list_files(&self, crawl_id: Uuid) -> Result<(Crawl, Vec<OutputFile>), CrawlUseCaseError> {
        let crawl = self.get_crawl(crawl_id).await?;
        let files = match results::list_output_files(&crawl.output_path).await {
            Ok(files) => files,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        Ok((crawl, files))
    }

    /// 取消任务，对已结束的任务没有影响
    pub async fn cancel_crawl(&self, crawl_id: Uuid) -> Result<(), CrawlUseCaseError> {
        self.get_crawl(crawl_id).await?;
        self.manager.cancel(crawl_id, CANCELLED_BY_CLIENT).await?;
        Ok(())
    }
}
