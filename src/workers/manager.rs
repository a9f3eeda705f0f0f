// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use dashmap::DashMap;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::{oneshot, Semaphore};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::models::crawl::CrawlStatus;
use crate::domain::repositories::crawl_repository::{CrawlRepository, RepositoryError};
use crate::engines::traits::{CrawlEngine, CrawlJob};
use crate::infrastructure::licence::LicenceManager;
use crate::infrastructure::observability::metrics;
use crate::workers::crawl_worker::CrawlWorker;

/// 服务关闭时取消任务使用的原因
pub const SHUTDOWN_MESSAGE: &str = "service shutting down";

/// 爬取任务管理器
///
/// 为每个爬取任务启动一个后台任务，并用全局信号量限制同时运行的
/// 爬虫进程数。等待名额的任务保持 `queued` 状态。
pub struct CrawlManager<C>
where
    C: CrawlRepository + 'static,
{
    repository: Arc<C>,
    worker: Arc<CrawlWorker<C>>,
    semaphore: Arc<Semaphore>,
    handles: Arc<DashMap<Uuid, JoinHandle<()>>>,
}

impl<C> CrawlManager<C>
where
    C: CrawlRepository + 'static,
{
    pub fn new(
        repository: Arc<C>,
        engine: Arc<dyn CrawlEngine>,
        licence: Arc<LicenceManager>,
        max_concurrent_crawls: usize,
    ) -> Self {
        let worker = Arc::new(CrawlWorker::new(repository.clone(), engine, licence));
        Self {
            repository,
            worker,
            semaphore: Arc::new(Semaphore::new(max_concurrent_crawls.max(1))),
            handles: Arc::new(DashMap::new()),
        }
    }

    /// 启动一个爬取任务
    ///
    /// 任务记录必须已经写入仓库
    pub fn dispatch(&self, job: CrawlJob) {
        let crawl_id = job.crawl_id;
        let worker = self.worker.clone();
        let semaphore = self.semaphore.clone();
        let handles = self.handles.clone();
        let (registered_tx, registered_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            // Wait until the handle is registered so the removal below never races the insert
            if registered_rx.await.is_err() {
                return;
            }

            match semaphore.acquire_owned().await {
                Ok(_permit) => match worker.process(job).await {
                    Ok(status) => info!(crawl_id = %crawl_id, "Crawl finished with status {}", status),
                    Err(e) => error!(crawl_id = %crawl_id, "Crawl worker error: {}", e),
                },
                Err(_) => warn!(crawl_id = %crawl_id, "Crawl manager closed before crawl could start"),
            }

            handles.remove(&crawl_id);
        });

        self.handles.insert(crawl_id, handle);
        let _ = registered_tx.send(());
    }

    /// 取消爬取任务
    ///
    /// 中止后台任务（爬虫子进程随之被终止），等待其结束后把未终止的
    /// 任务记录标记为已取消。
    ///
    /// # 返回值
    ///
    /// * `Ok(true)` - 找到并中止了运行中的后台任务
    /// * `Ok(false)` - 没有对应的后台任务
    pub async fn cancel(&self, crawl_id: Uuid, reason: &str) -> Result<bool, RepositoryError> {
        let live = match self.handles.remove(&crawl_id) {
            Some((_, handle)) => {
                handle.abort();
                let _ = handle.await;
                true
            }
            None => false,
        };

        if let Some(mut crawl) = self.repository.find_by_id(crawl_id).await? {
            if !crawl.status.is_terminal() {
                crawl.mark_cancelled(reason);
                self.repository.update(&crawl).await?;
                metrics::record_terminal(CrawlStatus::Cancelled);
                info!(crawl_id = %crawl_id, "Crawl cancelled: {}", reason);
            }
        }

        Ok(live)
    }

    /// 当前仍在排队或运行的任务数
    pub fn active_count(&self) -> usize {
        self.handles.len()
    }

    /// 关闭管理器，取消所有未完成的任务
    pub async fn shutdown(&self) {
        self.semaphore.close();

        let ids: Vec<Uuid> = self.handles.iter().map(|entry| *entry.key()).collect();
        if !ids.is_empty() {
            info!("Cancelling {} active crawls", ids.len());
        }

        let results = join_all(ids.iter().map(|id| self.cancel(*id, SHUTDOWN_MESSAGE))).await;
        for (id, result) in ids.iter().zip(results) {
            if let Err(e) = result {
                error!(crawl_id = %id, "Failed to cancel crawl during shutdown: {}", e);
            }
        }

        info!("Crawl manager shut down");
    }
}
