// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::config::settings::StorageSettings;
use crate::domain::repositories::config_repository::{
    validate_config_name, ConfigRepository, StorageError, CONFIG_EXTENSION,
};

/// 本地文件系统配置存储
///
/// 读取两个目录：只读挂载的 `config_dir` 与可写的 `upload_dir`。
/// 上传写入 `upload_dir`，解析时上传目录优先。
pub struct LocalConfigStorage {
    config_dir: PathBuf,
    upload_dir: PathBuf,
}

impl LocalConfigStorage {
    pub fn new(config_dir: impl Into<PathBuf>, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            upload_dir: upload_dir.into(),
        }
    }

    pub fn from_settings(settings: &StorageSettings) -> Self {
        Self::new(settings.config_dir.clone(), settings.upload_dir.clone())
    }

    async fn collect_names(dir: &Path, names: &mut BTreeSet<String>) -> Result<(), StorageError> {
        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(CONFIG_EXTENSION) && !name.starts_with('.') {
                    names.insert(name.to_string());
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ConfigRepository for LocalConfigStorage {
    async fn save(&self, name: &str, data: &[u8]) -> Result<PathBuf, StorageError> {
        validate_config_name(name)?;
        fs::create_dir_all(&self.upload_dir).await?;

        let target = self.upload_dir.join(name);
        let tmp = self.upload_dir.join(format!(".{}.{}.tmp", name, Uuid::new_v4()));

        let mut file = fs::File::create(&tmp).await?;
        file.write_all(data).await?;
        file.flush().await?;
        drop(file);

        if let Err(e) = fs::rename(&tmp, &target).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(target)
    }

    async fn list(&self) -> Result<Vec<String>, StorageError> {
        let mut names = BTreeSet::new();
        Self::collect_names(&self.config_dir, &mut names).await?;
        Self::collect_names(&self.upload_dir, &mut names).await?;
        Ok(names.into_iter().collect())
    }

    async fn resolve(&self, name: &str) -> Result<Option<PathBuf>, StorageError> {
        validate_config_name(name)?;
        for dir in [&self.upload_dir, &self.config_dir] {
            let candidate = dir.join(name);
            if fs::try_exists(&candidate).await? {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }
}
