// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;
use seospider_api::application::dto::crawl_response::CrawlStatusDto;
use seospider_api::application::use_cases::config_use_case::ConfigUseCase;
use seospider_api::application::use_cases::crawl_use_case::CrawlUseCase;
use seospider_api::config::settings::LicenceSettings;
use seospider_api::domain::models::crawl::CrawlStatus;
use seospider_api::engines::traits::{CrawlEngine, CrawlJob, CrawlOutcome, EngineError};
use seospider_api::infrastructure::licence::LicenceManager;
use seospider_api::infrastructure::repositories::crawl_repo_impl::CrawlRepositoryImpl;
use seospider_api::infrastructure::storage::LocalConfigStorage;
use seospider_api::presentation::routes;
use seospider_api::workers::manager::CrawlManager;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use uuid::Uuid;

pub const DEFAULT_CONFIG: &str = "default_config.seospider";
pub const EXPORT_BODY: &str = "Address,Status Code\nhttps://example.com/,200\n";

/// 假引擎的行为
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FakeBehaviour {
    /// 在时间戳子目录写入 `<export_type>.<ext>` 并成功退出
    Succeed,
    /// 成功退出但不写任何导出文件
    SucceedWithoutOutput,
    /// 以退出码 1 失败
    Fail,
    /// 一直运行直到被取消
    Hang,
}

/// 代替爬虫进程的引擎，记录收到的任务
pub struct FakeEngine {
    behaviour: FakeBehaviour,
    pub jobs: Mutex<Vec<CrawlJob>>,
}

impl FakeEngine {
    pub fn new(behaviour: FakeBehaviour) -> Self {
        Self {
            behaviour,
            jobs: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CrawlEngine for FakeEngine {
    async fn run(&self, job: &CrawlJob) -> Result<CrawlOutcome, EngineError> {
        self.jobs.lock().unwrap().push(job.clone());
        tokio::fs::create_dir_all(&job.output_dir).await?;

        match self.behaviour {
            FakeBehaviour::Succeed => {
                let dir = job.output_dir.join("2025.06.01.12.00.00");
                tokio::fs::create_dir_all(&dir).await?;
                let name = format!("{}.{}", job.export_type, job.export_format.extension());
                tokio::fs::write(dir.join(name), EXPORT_BODY).await?;
                Ok(success())
            }
            FakeBehaviour::SucceedWithoutOutput => Ok(success()),
            FakeBehaviour::Fail => Ok(CrawlOutcome {
                success: false,
                exit_code: Some(1),
                stderr_tail: "Crawl aborted: unable to connect".to_string(),
            }),
            FakeBehaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(success())
            }
        }
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

fn success() -> CrawlOutcome {
    CrawlOutcome {
        success: true,
        exit_code: Some(0),
        stderr_tail: String::new(),
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub router: Router,
    pub engine: Arc<FakeEngine>,
    pub crawl_repo: Arc<CrawlRepositoryImpl>,
    pub manager: Arc<CrawlManager<CrawlRepositoryImpl>>,
    // Keep the directory alive for the lifetime of the app
    pub dir: TempDir,
}

impl TestApp {
    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("crawls")
    }

    pub fn config_dir(&self) -> PathBuf {
        self.dir.path().join("config")
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }
}

pub async fn create_test_app(behaviour: FakeBehaviour) -> TestApp {
    create_test_app_in(tempfile::tempdir().unwrap(), behaviour).await
}

/// 在已有目录上构建应用，目录中已存在的任务清单会被加载
pub async fn create_test_app_in(dir: TempDir, behaviour: FakeBehaviour) -> TestApp {
    let licence = licence_settings(dir.path());
    build_test_app(dir, behaviour, licence).await
}

/// 使用指定的许可证设置构建应用，启动时的许可证检查与服务入口一致
pub async fn build_test_app(dir: TempDir, behaviour: FakeBehaviour, licence: LicenceSettings) -> TestApp {
    let root = dir.path();
    std::fs::create_dir_all(root.join("config")).unwrap();

    let crawl_repo = Arc::new(CrawlRepositoryImpl::new(root.join("crawls")));
    crawl_repo.load_existing().await.unwrap();

    let config_repo = Arc::new(LocalConfigStorage::new(root.join("config"), root.join("uploads")));
    let engine = Arc::new(FakeEngine::new(behaviour));
    let licence = Arc::new(LicenceManager::new(&licence));
    licence.check_at_startup().await;
    let manager = Arc::new(CrawlManager::new(
        crawl_repo.clone(),
        engine.clone(),
        licence,
        2,
    ));

    let crawl_use_case = Arc::new(CrawlUseCase::new(
        crawl_repo.clone(),
        config_repo.clone(),
        manager.clone(),
        root.join("crawls"),
        DEFAULT_CONFIG,
    ));
    let config_use_case = Arc::new(ConfigUseCase::new(config_repo));

    let router = routes::app(crawl_use_case, config_use_case, 1024 * 1024);
    let server = TestServer::new(router.clone()).unwrap();

    TestApp {
        server,
        router,
        engine,
        crawl_repo,
        manager,
        dir,
    }
}

pub fn licence_settings(root: &Path) -> LicenceSettings {
    LicenceSettings {
        user_dir: root.join("licence"),
        name: Some("Test Org".to_string()),
        key: Some("TEST-KEY".to_string()),
    }
}

/// 提交一个爬取任务，返回状态响应
pub async fn submit_crawl(app: &TestApp, body: serde_json::Value) -> CrawlStatusDto {
    let response = app.server.post("/crawl/").json(&body).await;
    response.assert_status_ok();
    response.json::<CrawlStatusDto>()
}

/// 轮询状态端点直到任务到达指定状态
pub async fn wait_for_status(app: &TestApp, crawl_id: Uuid, status: CrawlStatus) -> CrawlStatusDto {
    for _ in 0..300 {
        let dto = app
            .server
            .get(&format!("/crawl/status/{}", crawl_id))
            .await
            .json::<CrawlStatusDto>();
        if dto.status == status {
            return dto;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("crawl {} never reached {}", crawl_id, status);
}
