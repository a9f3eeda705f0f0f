// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::use_cases::{config_use_case::ConfigUseCase, crawl_use_case::CrawlUseCase};
use crate::domain::repositories::{config_repository::ConfigRepository, crawl_repository::CrawlRepository};
use crate::infrastructure::observability::metrics;
use crate::presentation::handlers::{config_handler, crawl_handler};
use axum::{
    extract::DefaultBodyLimit,
    http::header,
    response::IntoResponse,
    routing::{delete, get, post},
    Extension, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// 集合端点同时接受带和不带结尾斜杠的路径
///
/// # 返回值
///
/// 返回配置好的路由，依赖的用例需通过 [`app`] 以 `Extension` 注入
pub fn routes<CR, CS>() -> Router
where
    CR: CrawlRepository + 'static,
    CS: ConfigRepository + 'static,
{
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/version", get(version))
        .route("/metrics", get(metrics_handler));

    let crawl_routes = Router::new()
        .route(
            "/crawl",
            post(crawl_handler::create_crawl::<CR, CS>).get(crawl_handler::list_crawls::<CR, CS>),
        )
        .route(
            "/crawl/",
            post(crawl_handler::create_crawl::<CR, CS>).get(crawl_handler::list_crawls::<CR, CS>),
        )
        .route(
            "/crawl/status/{crawl_id}",
            get(crawl_handler::get_crawl_status::<CR, CS>),
        )
        .route(
            "/crawl/results/{crawl_id}",
            get(crawl_handler::get_crawl_results::<CR, CS>),
        )
        .route(
            "/crawl/files/{crawl_id}",
            get(crawl_handler::list_crawl_files::<CR, CS>),
        )
        .route(
            "/crawl/{crawl_id}",
            delete(crawl_handler::cancel_crawl::<CR, CS>),
        );

    let config_routes = Router::new()
        .route("/config/upload", post(config_handler::upload_config::<CS>))
        .route("/config/upload/", post(config_handler::upload_config::<CS>))
        .route("/config/list", get(config_handler::list_configs::<CS>))
        .route("/config/list/", get(config_handler::list_configs::<CS>));

    Router::new()
        .merge(public_routes)
        .merge(crawl_routes)
        .merge(config_routes)
}

/// 组装完整的应用：路由、用例注入、请求追踪与上传大小限制
pub fn app<CR, CS>(
    crawl_use_case: Arc<CrawlUseCase<CR, CS>>,
    config_use_case: Arc<ConfigUseCase<CS>>,
    max_upload_bytes: usize,
) -> Router
where
    CR: CrawlRepository + 'static,
    CS: ConfigRepository + 'static,
{
    routes::<CR, CS>().layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(DefaultBodyLimit::max(max_upload_bytes))
            .layer(Extension(crawl_use_case))
            .layer(Extension(config_use_case)),
    )
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Prometheus 指标端点
pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::render(),
    )
}
