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

use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

use crate::domain::models::crawl::CrawlStatus;
use crate::domain::repositories::crawl_repository::CrawlRepository;
use crate::engines::traits::{CrawlEngine, CrawlJob};
use crate::infrastructure::licence::LicenceManager;
use crate::infrastructure::observability::metrics::{self, RunningGuard};
use crate::utils::errors::WorkerError;

/// 爬取工作器
///
/// 执行单个爬取任务：标记运行、准备许可证、调用引擎并记录结果。
pub struct CrawlWorker<C>
where
    C: CrawlRepository + 'static,
{
    repository: Arc<C>,
    engine: Arc<dyn CrawlEngine>,
    licence: Arc<LicenceManager>,
}

impl<C> CrawlWorker<C>
where
    C: CrawlRepository + 'static,
{
    /// 创建新的爬取工作器实例
    pub fn new(repository: Arc<C>, engine: Arc<dyn CrawlEngine>, licence: Arc<LicenceManager>) -> Self {
        Self {
            repository,
            engine,
            licence,
        }
    }

    /// 处理一个爬取任务
    ///
    /// # 返回值
    ///
    /// * `Ok(CrawlStatus)` - 任务最终状态
    /// * `Err(WorkerError)` - 任务记录不存在或仓库写入失败
    #[instrument(skip(self, job), fields(crawl_id = %job.crawl_id, url = %job.url, engine = self.engine.name()))]
    pub async fn process(&self, job: CrawlJob) -> Result<CrawlStatus, WorkerError> {
        let mut crawl = self
            .repository
            .find_by_id(job.crawl_id)
            .await?
            .ok_or(WorkerError::NotFound(job.crawl_id))?;

        if crawl.status.is_terminal() {
            warn!("Crawl already {} before start, skipping", crawl.status);
            return Ok(crawl.status);
        }

        crawl.mark_running();
        self.repository.update(&crawl).await?;

        if let Err(e) = self.licence.ensure().await {
            error!("{}", e);
            crawl.mark_failed(e.to_string(), None);
            self.repository.update(&crawl).await?;
            metrics::record_terminal(CrawlStatus::Failed);
            return Ok(CrawlStatus::Failed);
        }

        info!("Crawl started");
        let started = Instant::now();
        let outcome = {
            let _running = RunningGuard::start();
            self.engine.run(&job).await
        };

        match outcome {
            Ok(outcome) if outcome.success => {
                info!(exit_code = ?outcome.exit_code, "Crawl completed");
                crawl.mark_completed(outcome.exit_code);
            }
            Ok(outcome) => {
                let message = outcome.failure_message();
                error!(exit_code = ?outcome.exit_code, "Crawl failed: {}", message);
                crawl.mark_failed(message, outcome.exit_code);
            }
            Err(e) => {
                error!("Crawl failed: {}", e);
                crawl.mark_failed(e.to_string(), None);
            }
        }

        self.repository.update(&crawl).await?;
        metrics::record_finished(crawl.status, started.elapsed());
        Ok(crawl.status)
    }
}
