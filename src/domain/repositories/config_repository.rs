// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// 爬虫配置文件扩展名
pub const CONFIG_EXTENSION: &str = ".seospider";

/// 配置存储错误类型
#[derive(Error, Debug)]
pub enum StorageError {
    /// 文件名不合法
    #[error("{0}")]
    InvalidName(String),
    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 配置仓库特质
///
/// 管理供爬虫使用的 `.seospider` 配置文件
#[async_trait]
pub trait ConfigRepository: Send + Sync {
    /// 保存配置文件，同名文件会被覆盖
    async fn save(&self, name: &str, data: &[u8]) -> Result<PathBuf, StorageError>;

    /// 列出所有可用的配置文件名
    async fn list(&self) -> Result<Vec<String>, StorageError>;

    /// 将配置文件名解析为磁盘路径，不存在时返回 `None`
    async fn resolve(&self, name: &str) -> Result<Option<PathBuf>, StorageError>;
}

/// 校验配置文件名
///
/// 只接受不含路径成分的 `*.seospider` 文件名
pub fn validate_config_name(name: &str) -> Result<(), StorageError> {
    if !name.ends_with(CONFIG_EXTENSION) {
        return Err(StorageError::InvalidName(
            "Invalid file type. Only .seospider files are allowed.".to_string(),
        ));
    }
    if name.len() == CONFIG_EXTENSION.len()
        || name.starts_with('.')
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || name.chars().any(char::is_control)
    {
        return Err(StorageError::InvalidName(format!(
            "Invalid config file name '{}'.",
            name
        )));
    }
    Ok(())
}
