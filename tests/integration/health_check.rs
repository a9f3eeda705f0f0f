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

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use seospider_api::infrastructure::repositories::crawl_repo_impl::CrawlRepositoryImpl;
use seospider_api::infrastructure::storage::LocalConfigStorage;
use seospider_api::presentation::routes;
use tower::util::ServiceExt;

use super::helpers::{create_test_app, FakeBehaviour};

/// 健康检查测试
///
/// 验证健康检查端点不依赖任何注入的用例
#[tokio::test]
async fn health_check_works() {
    let app = routes::routes::<CrawlRepositoryImpl, LocalConfigStorage>();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn version_returns_crate_version() {
    let app = create_test_app(FakeBehaviour::Succeed).await;

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/version").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], env!("CARGO_PKG_VERSION").as_bytes());
}

#[tokio::test]
async fn metrics_endpoint_is_plain_text() {
    let app = create_test_app(FakeBehaviour::Succeed).await;

    let response = app.server.get("/metrics").await;
    response.assert_status_ok();
    assert!(response
        .header("content-type")
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
}
