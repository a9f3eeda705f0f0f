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
    extract::{rejection::JsonRejection, Extension, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use crate::{
    application::{
        dto::{
            crawl_request::CrawlRequestDto,
            crawl_response::{CrawlFilesDto, CrawlListDto, CrawlStatusDto},
        },
        use_cases::crawl_use_case::{parse_crawl_id, CrawlUseCase},
    },
    domain::repositories::{config_repository::ConfigRepository, crawl_repository::CrawlRepository},
    presentation::errors::AppError,
};

/// 启动新的爬取任务
pub async fn create_crawl<CR, CS>(
    Extension(use_case): Extension<Arc<CrawlUseCase<CR, CS>>>,
    payload: Result<Json<CrawlRequestDto>, JsonRejection>,
) -> Result<Json<CrawlStatusDto>, AppError>
where
    CR: CrawlRepository + 'static,
    CS: ConfigRepository + 'static,
{
    let Json(payload) = payload.map_err(|e| AppError::new(e.status(), e.body_text()))?;
    let crawl = use_case.create_crawl(payload).await?;
    Ok(Json(CrawlStatusDto::from(&crawl)))
}

/// 列出所有爬取任务
pub async fn list_crawls<CR, CS>(
    Extension(use_case): Extension<Arc<CrawlUseCase<CR, CS>>>,
) -> Result<Json<CrawlListDto>, AppError>
where
    CR: CrawlRepository + 'static,
    CS: ConfigRepository + 'static,
{
    let crawls = use_case.list_crawls().await?;
    Ok(Json(CrawlListDto {
        crawls: crawls.iter().map(CrawlStatusDto::from).collect(),
    }))
}

/// 查询爬取任务状态
pub async fn get_crawl_status<CR, CS>(
    Extension(use_case): Extension<Arc<CrawlUseCase<CR, CS>>>,
    Path(crawl_id): Path<String>,
) -> Result<Json<CrawlStatusDto>, AppError>
where
    CR: CrawlRepository + 'static,
    CS: ConfigRepository + 'static,
{
    let crawl = use_case.get_crawl(parse_crawl_id(&crawl_id)?).await?;
    Ok(Json(CrawlStatusDto::from(&crawl)))
}

/// 下载爬取结果文件
pub async fn get_crawl_results<CR, CS>(
    Extension(use_case): Extension<Arc<CrawlUseCase<CR, CS>>>,
    Path(crawl_id): Path<String>,
) -> Result<Response, AppError>
where
    CR: CrawlRepository + 'static,
    CS: ConfigRepository + 'static,
{
    let result = use_case.get_result_file(parse_crawl_id(&crawl_id)?).await?;

    let file = tokio::fs::File::open(&result.path).await.map_err(|e| {
        AppError::new(
            StatusCode::NOT_FOUND,
            format!("Result file not found: {} ({})", result.path.display(), e),
        )
    })?;
    let length = file.metadata().await.ok().map(|m| m.len());

    let disposition = format!(
        "attachment; filename=\"{}\"",
        result.file_name.replace(['"', '\\'], "_")
    );

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, result.media_type)
        .header(header::CONTENT_DISPOSITION, disposition);
    if let Some(length) = length {
        builder = builder.header(header::CONTENT_LENGTH, length);
    }

    builder
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| AppError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

/// 列出爬取输出目录中的文件
pub async fn list_crawl_files<CR, CS>(
    Extension(use_case): Extension<Arc<CrawlUseCase<CR, CS>>>,
    Path(crawl_id): Path<String>,
) -> Result<Json<CrawlFilesDto>, AppError>
where
    CR: CrawlRepository + 'static,
    CS: ConfigRepository + 'static,
{
    let (crawl, files) = use_case.list_files(parse_crawl_id(&crawl_id)?).await?;
    Ok(Json(CrawlFilesDto {
        crawl_id: crawl.id,
        output_path: crawl.output_path.to_string_lossy().into_owned(),
        files,
    }))
}

/// 取消爬取任务
pub async fn cancel_crawl<CR, CS>(
    Extension(use_case): Extension<Arc<CrawlUseCase<CR, CS>>>,
    Path(crawl_id): Path<String>,
) -> Result<impl IntoResponse, AppError>
where
    CR: CrawlRepository + 'static,
    CS: ConfigRepository + 'static,
{
    use_case.cancel_crawl(parse_crawl_id(&crawl_id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
