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

use anyhow::Context;
use seospider_api::application::use_cases::config_use_case::ConfigUseCase;
use seospider_api::application::use_cases::crawl_use_case::CrawlUseCase;
use seospider_api::config::settings::Settings;
use seospider_api::engines::seospider_engine::SeoSpiderEngine;
use seospider_api::infrastructure::licence::LicenceManager;
use seospider_api::infrastructure::observability::metrics;
use seospider_api::infrastructure::repositories::crawl_repo_impl::CrawlRepositoryImpl;
use seospider_api::infrastructure::storage::LocalConfigStorage;
use seospider_api::presentation::routes;
use seospider_api::utils::telemetry;
use seospider_api::workers::manager::CrawlManager;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;

    // 2. Initialize logging and metrics
    telemetry::init_telemetry(settings.logging.format);
    info!("Starting seospider-api {}...", env!("CARGO_PKG_VERSION"));
    metrics::init_metrics();

    // 3. Prepare directories
    for dir in [&settings.storage.crawl_data_dir, &settings.storage.upload_dir] {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    if !tokio::fs::try_exists(&settings.storage.config_dir).await.unwrap_or(false) {
        warn!(
            "Config directory {} does not exist; only uploaded configs are available",
            settings.storage.config_dir.display()
        );
    }

    // 4. Restore crawl history
    let crawl_repo = Arc::new(CrawlRepositoryImpl::new(settings.storage.crawl_data_dir.clone()));
    let restored = crawl_repo.load_existing().await?;
    info!("Restored {} crawls", restored);

    // 5. Initialize components
    let config_repo = Arc::new(LocalConfigStorage::from_settings(&settings.storage));
    let engine = Arc::new(SeoSpiderEngine::new(&settings.crawler));
    let licence = Arc::new(LicenceManager::new(&settings.licence));
    licence.check_at_startup().await;

    let manager = Arc::new(CrawlManager::new(
        crawl_repo.clone(),
        engine,
        licence,
        settings.crawler.max_concurrent_crawls,
    ));

    let crawl_use_case = Arc::new(CrawlUseCase::new(
        crawl_repo,
        config_repo.clone(),
        manager.clone(),
        settings.storage.crawl_data_dir.clone(),
        settings.crawler.default_config_file.clone(),
    ));
    let config_use_case = Arc::new(ConfigUseCase::new(config_repo));

    // 6. Start HTTP server
    let app = routes::app(crawl_use_case, config_use_case, settings.server.max_upload_bytes);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 7. Stop running crawls
    manager.shutdown().await;
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
