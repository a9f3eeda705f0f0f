// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::repositories::crawl_repository::RepositoryError;

/// Worker错误类型
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("仓库错误: {0}")]
    Repository(#[from] RepositoryError),

    #[error("未找到爬取任务: {0}")]
    NotFound(Uuid),
}
