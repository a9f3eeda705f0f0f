// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::application::use_cases::{
    config_use_case::ConfigUseCaseError, crawl_use_case::CrawlUseCaseError,
};

/// 应用错误类型
///
/// 携带HTTP状态码与错误信息，响应体为 `{"error": "<message>"}`
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, "{}", self.message);
        }
        let body = Json(json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

impl From<CrawlUseCaseError> for AppError {
    fn from(err: CrawlUseCaseError) -> Self {
        let status = match &err {
            CrawlUseCaseError::Validation(_) | CrawlUseCaseError::NotReady => StatusCode::BAD_REQUEST,
            CrawlUseCaseError::NotFound | CrawlUseCaseError::NoResults { .. } => StatusCode::NOT_FOUND,
            CrawlUseCaseError::OutputMissing
            | CrawlUseCaseError::Repository(_)
            | CrawlUseCaseError::Storage(_)
            | CrawlUseCaseError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl From<ConfigUseCaseError> for AppError {
    fn from(err: ConfigUseCaseError) -> Self {
        let status = match &err {
            ConfigUseCaseError::Validation(_) => StatusCode::BAD_REQUEST,
            ConfigUseCaseError::Upload(_) | ConfigUseCaseError::List(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err.to_string())
    }
}
