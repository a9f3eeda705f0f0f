// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use std::time::Duration;
use tracing::warn;

use crate::domain::models::crawl::CrawlStatus;

static PROMETHEUS: OnceCell<PrometheusHandle> = OnceCell::new();

pub const CRAWL_JOBS_SUBMITTED: &str = "crawl_jobs_submitted_total";
pub const CRAWL_JOBS_COMPLETED: &str = "crawl_jobs_completed_total";
pub const CRAWL_JOBS_FAILED: &str = "crawl_jobs_failed_total";
pub const CRAWL_JOBS_CANCELLED: &str = "crawl_jobs_cancelled_total";
pub const CRAWL_JOBS_RUNNING: &str = "crawl_jobs_running";
pub const CRAWL_DURATION: &str = "crawl_duration_seconds";

/// 初始化指标系统
///
/// 安装全局 Prometheus recorder 并注册指标说明。重复调用返回同一个句柄；
/// 安装失败（例如已有其他 recorder）时返回 `None`，指标宏退化为空操作。
pub fn init_metrics() -> Option<PrometheusHandle> {
    PROMETHEUS
        .get_or_try_init(|| {
            let handle = PrometheusBuilder::new().install_recorder()?;
            describe_metrics();
            Ok::<_, metrics_exporter_prometheus::BuildError>(handle)
        })
        .map_err(|e| warn!("Failed to install Prometheus recorder: {}", e))
        .ok()
        .cloned()
}

/// 以 Prometheus 文本格式导出当前指标，未安装 recorder 时为空
pub fn render() -> String {
    PROMETHEUS.get().map(PrometheusHandle::render).unwrap_or_default()
}

fn describe_metrics() {
    describe_counter!(CRAWL_JOBS_SUBMITTED, "Total number of crawl jobs submitted");
    describe_counter!(CRAWL_JOBS_COMPLETED, "Total number of crawl jobs completed");
    describe_counter!(CRAWL_JOBS_FAILED, "Total number of crawl jobs failed");
    describe_counter!(CRAWL_JOBS_CANCELLED, "Total number of crawl jobs cancelled");
    describe_gauge!(CRAWL_JOBS_RUNNING, "Crawler processes currently running");
    describe_histogram!(CRAWL_DURATION, "Wall-clock duration of crawler runs in seconds");
}

pub fn record_submitted() {
    counter!(CRAWL_JOBS_SUBMITTED).increment(1);
}

/// 运行中任务计数守卫
///
/// 创建时加一，丢弃时减一；任务被中止时同样会正确回落。
pub struct RunningGuard(());

impl RunningGuard {
    pub fn start() -> Self {
        gauge!(CRAWL_JOBS_RUNNING).increment(1.0);
        Self(())
    }
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        gauge!(CRAWL_JOBS_RUNNING).decrement(1.0);
    }
}

/// 记录一次爬虫运行结束
pub fn record_finished(status: CrawlStatus, elapsed: Duration) {
    histogram!(CRAWL_DURATION, "status" => status.to_string()).record(elapsed.as_secs_f64());
    record_terminal(status);
}

/// 记录进入终止状态的任务数
pub fn record_terminal(status: CrawlStatus) {
    match status {
        CrawlStatus::Completed => counter!(CRAWL_JOBS_COMPLETED).increment(1),
        CrawlStatus::Failed => counter!(CRAWL_JOBS_FAILED).increment(1),
        CrawlStatus::Cancelled => counter!(CRAWL_JOBS_CANCELLED).increment(1),
        CrawlStatus::Queued | CrawlStatus::Running => {}
    }
}
