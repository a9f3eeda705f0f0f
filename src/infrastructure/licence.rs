// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::config::settings::LicenceSettings;

/// 爬虫读取的许可证文件名
pub const LICENCE_FILE: &str = "licence.txt";

/// 许可证错误类型
#[derive(Error, Debug)]
pub enum LicenceError {
    #[error("Failed to write licence: {0}")]
    Write(#[from] std::io::Error),
}

/// 许可证状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenceStatus {
    /// 已根据配置写入许可证
    Written,
    /// 使用已有（通常是只读挂载）的许可证文件
    Mounted,
    /// 没有许可证，爬虫运行在免费模式
    Unlicensed,
}

/// 许可证管理器
///
/// 在每次爬取前确保爬虫用户目录中存在 `licence.txt`
pub struct LicenceManager {
    user_dir: PathBuf,
    credentials: Option<(String, String)>,
}

impl LicenceManager {
    pub fn new(settings: &LicenceSettings) -> Self {
        let credentials = match (&settings.name, &settings.key) {
            (Some(name), Some(key)) if !name.trim().is_empty() && !key.trim().is_empty() => {
                Some((name.trim().to_string(), key.trim().to_string()))
            }
            _ => None,
        };
        Self {
            user_dir: settings.user_dir.clone(),
            credentials,
        }
    }

    pub fn licence_path(&self) -> PathBuf {
        self.user_dir.join(LICENCE_FILE)
    }

    /// 确保许可证可用
    ///
    /// 有凭据时写入许可证文件（内容相同则跳过）；写入失败但文件已存在时
    /// 视为只读挂载继续使用。没有凭据时检查是否已有挂载的文件。
    pub async fn ensure(&self) -> Result<LicenceStatus, LicenceError> {
        let path = self.licence_path();
        let exists = fs::try_exists(&path).await.unwrap_or(false);

        let Some((name, key)) = &self.credentials else {
            if exists {
                debug!("Using mounted licence at {}", path.display());
                return Ok(LicenceStatus::Mounted);
            }
            warn!("No licence name/key configured and no licence file found; crawls are limited to 500 URLs");
            return Ok(LicenceStatus::Unlicensed);
        };

        let content = format!("{}\n{}\n", name, key);
        if exists {
            if let Ok(current) = fs::read_to_string(&path).await {
                if current == content {
                    return Ok(LicenceStatus::Written);
                }
            }
        }

        let written = async {
            fs::create_dir_all(&self.user_dir).await?;
            fs::write(&path, &content).await
        }
        .await;

        match written {
            Ok(()) => {
                info!("Licence written to {}", path.display());
                Ok(LicenceStatus::Written)
            }
            Err(e) if exists => {
                warn!(
                    "Could not write licence to {} ({}); using the existing file",
                    path.display(),
                    e
                );
                Ok(LicenceStatus::Mounted)
            }
            Err(e) => Err(LicenceError::Write(e)),
        }
    }

    /// 启动时检查许可证，失败只记录警告
    ///
    /// 服务照常启动，之后每次爬取前的 [`ensure`](Self::ensure) 会让对应任务失败。
    pub async fn check_at_startup(&self) -> Option<LicenceStatus> {
        match self.ensure().await {
            Ok(status) => {
                info!("Licence status: {:?}", status);
                Some(status)
            }
            Err(e) => {
                warn!("{}; crawls will fail until the licence can be written", e);
                None
            }
        }
    }
}
