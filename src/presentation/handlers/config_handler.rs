// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Multipart},
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::{
    application::{
        dto::config_response::{ConfigListDto, ConfigUploadDto},
        use_cases::config_use_case::ConfigUseCase,
    },
    domain::repositories::config_repository::ConfigRepository,
    presentation::errors::AppError,
};

/// 上传 `.seospider` 配置文件，表单字段名为 `file`
pub async fn upload_config<CS>(
    Extension(use_case): Extension<Arc<ConfigUseCase<CS>>>,
    mut multipart: Multipart,
) -> Result<Json<ConfigUploadDto>, AppError>
where
    CS: ConfigRepository + 'static,
{
    let to_error = |e: axum::extract::multipart::MultipartError| AppError::new(e.status(), e.body_text());

    while let Some(field) = multipart.next_field().await.map_err(to_error)? {
        if field.name() != Some("file") {
            debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let data = field.bytes().await.map_err(to_error)?;
        let name = use_case.upload(file_name.as_deref(), &data).await?;

        return Ok(Json(ConfigUploadDto {
            message: format!("Config file '{}' uploaded successfully.", name),
        }));
    }

    Err(AppError::bad_request("No file uploaded. Use the 'file' form field."))
}

/// 列出可用的配置文件
pub async fn list_configs<CS>(
    Extension(use_case): Extension<Arc<ConfigUseCase<CS>>>,
) -> Result<Json<ConfigListDto>, AppError>
where
    CS: ConfigRepository + 'static,
{
    let config_files = use_case.list().await?;
    Ok(Json(ConfigListDto { config_files }))
}
