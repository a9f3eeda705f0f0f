// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::domain::repositories::config_repository::{ConfigRepository, StorageError};

#[derive(Error, Debug)]
pub enum ConfigUseCaseError {
    #[error("{0}")]
    Validation(String),
    #[error("Could not upload file: {0}")]
    Upload(StorageError),
    #[error("Error listing config files: {0}")]
    List(StorageError),
}

/// 爬虫配置文件用例
pub struct ConfigUseCase<CS: ConfigRepository + 'static> {
    config_repo: Arc<CS>,
}

impl<CS: ConfigRepository + 'static> ConfigUseCase<CS> {
    pub fn new(config_repo: Arc<CS>) -> Self {
        Self { config_repo }
    }

    /// 保存上传的配置文件，返回保存后的文件名
    pub async fn upload(&self, file_name: Option<&str>, data: &[u8]) -> Result<String, ConfigUseCaseError> {
        let name = file_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ConfigUseCaseError::Validation("No file name provided.".to_string()))?;

        match self.config_repo.save(name, data).await {
            Ok(path) => {
                info!(bytes = data.len(), "Config file saved to {}", path.display());
                Ok(name.to_string())
            }
            Err(StorageError::InvalidName(msg)) => Err(ConfigUseCaseError::Validation(msg)),
            Err(e) => Err(ConfigUseCaseError::Upload(e)),
        }
    }

    pub async fn list(&self) -> Result<Vec<String>, ConfigUseCaseError> {
        self.config_repo.list().await.map_err(ConfigUseCaseError::List)
    }
}
