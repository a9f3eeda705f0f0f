// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use serde_json::{json, Value};
use seospider_api::application::dto::crawl_response::CrawlStatusDto;
use seospider_api::domain::models::crawl::CrawlStatus;
use seospider_api::domain::models::export::ExportFormat;
use uuid::Uuid;

use super::helpers::{
    build_test_app, create_test_app, licence_settings, submit_crawl, wait_for_status,
    FakeBehaviour, DEFAULT_CONFIG, EXPORT_BODY,
};

#[tokio::test]
async fn crawl_runs_and_results_download() {
    let app = create_test_app(FakeBehaviour::Succeed).await;

    let created = submit_crawl(&app, json!({"url": "https://example.com"})).await;
    assert!(matches!(created.status, CrawlStatus::Queued | CrawlStatus::Running));
    assert_eq!(created.url, "https://example.com");
    assert_eq!(created.export_format, ExportFormat::Csv);
    assert_eq!(created.export_type, "all_links");
    assert_eq!(created.config_file, DEFAULT_CONFIG);
    assert!(!created.results_ready);
    assert_eq!(
        created.output_path,
        app.data_dir().join(created.crawl_id.to_string()).to_string_lossy()
    );

    let done = wait_for_status(&app, created.crawl_id, CrawlStatus::Completed).await;
    assert!(done.results_ready);
    assert_eq!(done.exit_code, Some(0));
    assert!(done.started_at.is_some());
    assert!(done.completed_at.is_some());

    let response = app
        .server
        .get(&format!("/crawl/results/{}", created.crawl_id))
        .await;
    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "text/csv");
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=\"all_links.csv\""
    );
    assert_eq!(response.text(), EXPORT_BODY);

    // No config file on disk: the crawler runs with its built-in defaults
    let jobs = app.engine.jobs.lock().unwrap().clone();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].config_path, None);
}

#[tokio::test]
async fn json_export_uses_json_media_type() {
    let app = create_test_app(FakeBehaviour::Succeed).await;

    let created = submit_crawl(
        &app,
        json!({"url": "https://example.com", "export_format": "JSON", "export_type": "internal_all"}),
    )
    .await;
    wait_for_status(&app, created.crawl_id, CrawlStatus::Completed).await;

    let response = app
        .server
        .get(&format!("/crawl/results/{}", created.crawl_id))
        .await;
    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "application/json");
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=\"internal_all.json\""
    );
}

#[tokio::test]
async fn invalid_requests_are_rejected() {
    let app = create_test_app(FakeBehaviour::Succeed).await;

    let response = app
        .server
        .post("/crawl/")
        .json(&json!({"url": "https://example.com", "export_format": "xml"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "Invalid export_format. Must be 'csv' or 'json'."
    );

    let response = app
        .server
        .post("/crawl/")
        .json(&json!({"url": "ftp://example.com"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"]
        .as_str()
        .unwrap()
        .contains("url"));

    let response = app
        .server
        .post("/crawl/")
        .json(&json!({"url": "https://example.com", "config_file": "missing.seospider"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "Config file 'missing.seospider' not found."
    );

    let response = app
        .server
        .post("/crawl/")
        .json(&json!({"url": "https://example.com", "export_type": "all; rm -rf /"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    // Nothing was registered
    let list = app.server.get("/crawl/").await.json::<Value>();
    assert_eq!(list["crawls"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn unknown_and_malformed_ids_are_not_found() {
    let app = create_test_app(FakeBehaviour::Succeed).await;

    for id in [Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
        let response = app.server.get(&format!("/crawl/status/{}", id)).await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["error"], "Crawl ID not found.");

        app.server
            .get(&format!("/crawl/results/{}", id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        app.server
            .get(&format!("/crawl/files/{}", id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        app.server
            .delete(&format!("/crawl/{}", id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn failed_crawl_reports_stderr_and_has_no_results() {
    let app = create_test_app(FakeBehaviour::Fail).await;

    let created = submit_crawl(&app, json!({"url": "https://example.com"})).await;
    let failed = wait_for_status(&app, created.crawl_id, CrawlStatus::Failed).await;
    assert_eq!(
        failed.error_message.as_deref(),
        Some("Crawl aborted: unable to connect")
    );
    assert_eq!(failed.exit_code, Some(1));
    assert!(!failed.results_ready);

    let response = app
        .server
        .get(&format!("/crawl/results/{}", created.crawl_id))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "Crawl not yet completed or failed."
    );
}

#[tokio::test]
async fn completed_crawl_without_export_is_not_found() {
    let app = create_test_app(FakeBehaviour::SucceedWithoutOutput).await;

    let created = submit_crawl(&app, json!({"url": "https://example.com"})).await;
    wait_for_status(&app, created.crawl_id, CrawlStatus::Completed).await;

    let response = app
        .server
        .get(&format!("/crawl/results/{}", created.crawl_id))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>()["error"],
        format!(
            "No csv results found in {}. Make sure export_type is correct.",
            created.output_path
        )
    );
}

#[tokio::test]
async fn completed_crawl_with_missing_output_dir_is_server_error() {
    let app = create_test_app(FakeBehaviour::Succeed).await;

    let created = submit_crawl(&app, json!({"url": "https://example.com"})).await;
    wait_for_status(&app, created.crawl_id, CrawlStatus::Completed).await;
    std::fs::remove_dir_all(&created.output_path).unwrap();

    let response = app
        .server
        .get(&format!("/crawl/results/{}", created.crawl_id))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>()["error"],
        "Output directory not found for completed crawl."
    );
}

#[tokio::test]
async fn running_crawl_can_be_cancelled() {
    let app = create_test_app(FakeBehaviour::Hang).await;

    let created = submit_crawl(&app, json!({"url": "https://example.com"})).await;
    wait_for_status(&app, created.crawl_id, CrawlStatus::Running).await;

    let response = app
        .server
        .get(&format!("/crawl/results/{}", created.crawl_id))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    app.server
        .delete(&format!("/crawl/{}", created.crawl_id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let cancelled = app
        .server
        .get(&format!("/crawl/status/{}", created.crawl_id))
        .await
        .json::<CrawlStatusDto>();
    assert_eq!(cancelled.status, CrawlStatus::Cancelled);
    assert_eq!(cancelled.error_message.as_deref(), Some("cancelled by client"));

    // Cancelling again is a no-op
    app.server
        .delete(&format!("/crawl/{}", created.crawl_id))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    assert_eq!(app.manager.active_count(), 0);
}

#[tokio::test]
async fn list_and_files_endpoints() {
    let app = create_test_app(FakeBehaviour::Succeed).await;

    let first = submit_crawl(&app, json!({"url": "https://a.example.com"})).await;
    wait_for_status(&app, first.crawl_id, CrawlStatus::Completed).await;
    let second = submit_crawl(&app, json!({"url": "https://b.example.com"})).await;
    wait_for_status(&app, second.crawl_id, CrawlStatus::Completed).await;

    // Both the slash and no-slash forms route
    for path in ["/crawl", "/crawl/"] {
        let list = app.server.get(path).await.json::<Value>();
        let crawls = list["crawls"].as_array().unwrap();
        assert_eq!(crawls.len(), 2);
        assert_eq!(crawls[0]["crawl_id"], second.crawl_id.to_string());
        assert_eq!(crawls[1]["crawl_id"], first.crawl_id.to_string());
    }

    let files = app
        .server
        .get(&format!("/crawl/files/{}", first.crawl_id))
        .await
        .json::<Value>();
    let files = files["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["path"], "2025.06.01.12.00.00/all_links.csv");
    assert_eq!(files[0]["size"], EXPORT_BODY.len() as u64);
}

#[tokio::test]
async fn licence_is_written_before_the_crawl() {
    let app = create_test_app(FakeBehaviour::Succeed).await;

    let created = submit_crawl(&app, json!({"url": "https://example.com"})).await;
    wait_for_status(&app, created.crawl_id, CrawlStatus::Completed).await;

    let licence = std::fs::read_to_string(app.dir.path().join("licence").join("licence.txt")).unwrap();
    assert_eq!(licence, "Test Org\nTEST-KEY\n");
}

#[tokio::test]
async fn unwritable_licence_fails_crawls_but_service_stays_up() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file where the licence directory should be
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();
    let mut licence = licence_settings(dir.path());
    licence.user_dir = blocker.join("seospider");

    let app = build_test_app(dir, FakeBehaviour::Succeed, licence).await;

    app.server.get("/health").await.assert_status_ok();
    app.server.get("/config/list/").await.assert_status_ok();

    let created = submit_crawl(&app, json!({"url": "https://example.com"})).await;
    let failed = wait_for_status(&app, created.crawl_id, CrawlStatus::Failed).await;
    assert!(failed
        .error_message
        .as_deref()
        .unwrap()
        .starts_with("Failed to write licence:"));
    assert!(app.engine.jobs.lock().unwrap().is_empty());
}
