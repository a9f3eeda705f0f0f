// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl::Crawl;
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// 仓库层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Crawl not found")]
    NotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 爬取任务仓库特质
///
/// 定义爬取任务数据访问接口。领域层只依赖该特质，
/// 不关心记录保存在内存还是磁盘上。
#[async_trait]
pub trait CrawlRepository: Send + Sync {
    /// 创建爬取任务
    ///
    /// # 参数
    ///
    /// * `crawl` - 要创建的爬取任务实体
    ///
    /// # 返回值
    ///
    /// * `Ok(Crawl)` - 成功创建后返回爬取任务
    /// * `Err(RepositoryError)` - 创建失败时返回错误
    async fn create(&self, crawl: &Crawl) -> Result<Crawl, RepositoryError>;

    /// 根据ID查找爬取任务
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(Crawl))` - 找到任务时返回任务实体
    /// * `Ok(None)` - 未找到任务时返回空
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Crawl>, RepositoryError>;

    /// 更新爬取任务
    ///
    /// 任务不存在时返回 `RepositoryError::NotFound`
    async fn update(&self, crawl: &Crawl) -> Result<Crawl, RepositoryError>;

    /// 列出所有爬取任务，按创建时间倒序
    async fn list(&self) -> Result<Vec<Crawl>, RepositoryError>;
}
