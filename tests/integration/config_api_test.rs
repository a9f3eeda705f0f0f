// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use serde_json::{json, Value};
use seospider_api::domain::models::crawl::CrawlStatus;

use super::helpers::{create_test_app, submit_crawl, wait_for_status, FakeBehaviour};

fn config_form(file_name: &str, body: &[u8]) -> MultipartForm {
    MultipartForm::new().add_part("file", Part::bytes(body.to_vec()).file_name(file_name))
}

#[tokio::test]
async fn upload_then_list_and_use_config() {
    let app = create_test_app(FakeBehaviour::Succeed).await;
    std::fs::write(app.config_dir().join("mounted.seospider"), b"ro").unwrap();

    let response = app
        .server
        .post("/config/upload/")
        .multipart(config_form("deep-crawl.seospider", b"<config/>"))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["message"],
        "Config file 'deep-crawl.seospider' uploaded successfully."
    );
    assert_eq!(
        std::fs::read(app.upload_dir().join("deep-crawl.seospider")).unwrap(),
        b"<config/>"
    );

    let list = app.server.get("/config/list/").await.json::<Value>();
    assert_eq!(
        list,
        json!({"config_files": ["deep-crawl.seospider", "mounted.seospider"]})
    );

    let created = submit_crawl(
        &app,
        json!({"url": "https://example.com", "config_file": "deep-crawl.seospider"}),
    )
    .await;
    wait_for_status(&app, created.crawl_id, CrawlStatus::Completed).await;

    let jobs = app.engine.jobs.lock().unwrap().clone();
    assert_eq!(
        jobs[0].config_path.as_deref(),
        Some(app.upload_dir().join("deep-crawl.seospider").as_path())
    );
}

#[tokio::test]
async fn mounted_default_config_is_passed_to_the_crawler() {
    let app = create_test_app(FakeBehaviour::Succeed).await;
    std::fs::write(app.config_dir().join("default_config.seospider"), b"cfg").unwrap();

    let created = submit_crawl(&app, json!({"url": "https://example.com"})).await;
    wait_for_status(&app, created.crawl_id, CrawlStatus::Completed).await;

    let jobs = app.engine.jobs.lock().unwrap().clone();
    assert_eq!(
        jobs[0].config_path.as_deref(),
        Some(app.config_dir().join("default_config.seospider").as_path())
    );
}

#[tokio::test]
async fn upload_rejects_wrong_extension_and_missing_field() {
    let app = create_test_app(FakeBehaviour::Succeed).await;

    let response = app
        .server
        .post("/config/upload")
        .multipart(config_form("settings.xml", b"x"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "Invalid file type. Only .seospider files are allowed."
    );

    let response = app
        .server
        .post("/config/upload/")
        .multipart(config_form("..seospider", b"x"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/config/upload/")
        .multipart(MultipartForm::new().add_text("other", "value"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let list = app.server.get("/config/list").await.json::<Value>();
    assert_eq!(list, json!({"config_files": []}));
}
