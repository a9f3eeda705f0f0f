// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::models::crawl::Crawl;
use crate::domain::repositories::crawl_repository::{CrawlRepository, RepositoryError};

/// 任务清单文件名，与爬取结果放在同一目录
pub const MANIFEST_FILE: &str = ".crawl.json";

/// 重启后仍处于非终止状态的任务使用的失败原因
pub const INTERRUPTED_MESSAGE: &str = "interrupted by service restart";

/// 爬取任务仓库实现
///
/// 任务记录保存在内存中的并发映射里；配置了数据目录时，
/// 每次写入还会同步一份清单到 `<data_dir>/<id>/.crawl.json`，
/// 使任务历史可以随挂载卷一起在重启后恢复。
#[derive(Clone)]
pub struct CrawlRepositoryImpl {
    crawls: Arc<DashMap<Uuid, Crawl>>,
    data_dir: Option<PathBuf>,
}

impl CrawlRepositoryImpl {
    /// 创建带磁盘清单的仓库
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            crawls: Arc::new(DashMap::new()),
            data_dir: Some(data_dir.into()),
        }
    }

    /// 创建纯内存仓库
    pub fn in_memory() -> Self {
        Self {
            crawls: Arc::new(DashMap::new()),
            data_dir: None,
        }
    }

    /// 从数据目录加载已有的任务清单
    ///
    /// 非终止状态的任务对应的进程已经不存在，会被标记为失败并回写。
    /// 损坏的清单会被跳过。
    ///
    /// # 返回值
    ///
    /// 成功加载的任务数量
    pub async fn load_existing(&self) -> Result<usize, RepositoryError> {
        let Some(data_dir) = &self.data_dir else {
            return Ok(0);
        };

        let mut entries = match fs::read_dir(data_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut loaded = 0;
        while let Some(entry) = entries.next_entry().await? {
            let manifest = entry.path().join(MANIFEST_FILE);
            let bytes = match fs::read(&manifest).await {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    warn!("Skipping unreadable manifest {}: {}", manifest.display(), e);
                    continue;
                }
            };

            let mut crawl: Crawl = match serde_json::from_slice(&bytes) {
                Ok(crawl) => crawl,
                Err(e) => {
                    warn!("Skipping corrupt manifest {}: {}", manifest.display(), e);
                    continue;
                }
            };

            if !crawl.status.is_terminal() {
                crawl.mark_failed(INTERRUPTED_MESSAGE, None);
                self.write_manifest(&crawl).await?;
            }

            self.crawls.insert(crawl.id, crawl);
            loaded += 1;
        }

        info!("Loaded {} crawl manifests from {}", loaded, data_dir.display());
        Ok(loaded)
    }

    fn manifest_path(data_dir: &Path, id: Uuid) -> PathBuf {
        data_dir.join(id.to_string()).join(MANIFEST_FILE)
    }

    async fn write_manifest(&self, crawl: &Crawl) -> Result<(), RepositoryError> {
        let Some(data_dir) = &self.data_dir else {
            return Ok(());
        };

        let path = Self::manifest_path(data_dir, crawl.id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write-then-rename, one temp file per write
        let tmp = path.with_file_name(format!("{}.{}.tmp", MANIFEST_FILE, Uuid::new_v4()));
        fs::write(&tmp, serde_json::to_vec_pretty(crawl)?).await?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        debug!(crawl_id = %crawl.id, status = %crawl.status, "Manifest written");
        Ok(())
    }
}

#[async_trait]
impl CrawlRepository for CrawlRepositoryImpl {
    async fn create(&self, crawl: &Crawl) -> Result<Crawl, RepositoryError> {
        self.write_manifest(crawl).await?;
        self.crawls.insert(crawl.id, crawl.clone());
        Ok(crawl.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Crawl>, RepositoryError> {
        Ok(self.crawls.get(&id).map(|c| c.value().clone()))
    }

    async fn update(&self, crawl: &Crawl) -> Result<Crawl, RepositoryError> {
        if !self.crawls.contains_key(&crawl.id) {
            return Err(RepositoryError::NotFound);
        }
        self.write_manifest(crawl).await?;
        self.crawls.insert(crawl.id, crawl.clone());
        Ok(crawl.clone())
    }

    async fn list(&self) -> Result<Vec<Crawl>, RepositoryError> {
        let mut crawls: Vec<Crawl> = self.crawls.iter().map(|c| c.value().clone()).collect();
        crawls.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(crawls)
    }
}
