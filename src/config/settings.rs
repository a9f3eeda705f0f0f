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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// 旧版部署使用的许可证环境变量
pub const LEGACY_LICENCE_NAME_ENV: &str = "SF_LICENSE_NAME";
pub const LEGACY_LICENCE_KEY_ENV: &str = "SF_LICENCE_KEY";

/// 应用程序配置设置
///
/// 包含服务器、存储目录、爬虫调用、许可证和日志等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 存储目录配置
    pub storage: StorageSettings,
    /// 爬虫调用配置
    pub crawler: CrawlerSettings,
    /// 许可证配置
    pub licence: LicenceSettings,
    /// 日志配置
    pub logging: LoggingSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
    /// 配置文件上传的最大字节数
    pub max_upload_bytes: usize,
}

/// 存储目录配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// 爬取输出根目录，通常挂载自宿主机
    pub crawl_data_dir: PathBuf,
    /// 只读挂载的 `.seospider` 配置目录
    pub config_dir: PathBuf,
    /// 通过 API 上传的配置文件存放目录
    pub upload_dir: PathBuf,
}

/// 爬虫调用配置
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerSettings {
    /// 爬虫可执行文件
    pub binary: String,
    /// 默认配置文件名，不存在时不传 `--config`
    pub default_config_file: String,
    /// 同时运行的爬虫进程上限
    pub max_concurrent_crawls: usize,
    /// 单次爬取超时时间（秒），0 表示不限制
    pub timeout_secs: u64,
    /// 失败时保留的 stderr 行数
    pub stderr_tail_lines: usize,
    /// 追加到命令行末尾的参数
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl CrawlerSettings {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// 许可证配置
#[derive(Debug, Clone, Deserialize)]
pub struct LicenceSettings {
    /// 爬虫读取 `licence.txt` 的用户目录
    pub user_dir: PathBuf,
    /// 许可证用户名
    pub name: Option<String>,
    /// 许可证密钥
    pub key: Option<String>,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// 输出格式：text 或 json
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

fn default_licence_dir() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/root".to_string());
    PathBuf::from(home)
        .join(".screamingfrog")
        .join("seospider")
        .to_string_lossy()
        .to_string()
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、`settings/default.toml`、`settings/{APP_ENVIRONMENT}.toml`
    /// 和 `SEOSPIDER__` 前缀的环境变量，最后兼容旧的许可证环境变量。
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_environment(Self::environment())
    }

    /// `SEOSPIDER__` 前缀的环境变量源
    ///
    /// `crawler.extra_args` 以空格分隔解析为列表
    fn environment() -> Environment {
        Environment::with_prefix("SEOSPIDER")
            .separator("__")
            .try_parsing(true)
            .list_separator(" ")
            .with_list_parse_key("crawler.extra_args")
    }

    fn with_environment(environment: Environment) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.max_upload_bytes", 16 * 1024 * 1024)?
            // Paths inside the container, see docker-compose.yml
            .set_default("storage.crawl_data_dir", "/app/data/crawls")?
            .set_default("storage.config_dir", "/app/config")?
            .set_default("storage.upload_dir", "/app/data/configs")?
            .set_default("crawler.binary", "screamingfrogseospider")?
            .set_default("crawler.default_config_file", "default_config.seospider")?
            .set_default("crawler.max_concurrent_crawls", 2)?
            .set_default("crawler.timeout_secs", 0)?
            .set_default("crawler.stderr_tail_lines", 50)?
            .set_default("licence.user_dir", default_licence_dir())?
            .set_default("logging.format", "text")?
            .add_source(File::with_name("settings/default").required(false))
            .add_source(File::with_name(&format!("settings/{}", env)).required(false))
            .add_source(environment);

        let mut settings: Settings = builder.build()?.try_deserialize()?;
        settings.apply_legacy_licence_env();
        Ok(settings)
    }

    fn apply_legacy_licence_env(&mut self) {
        if self.licence.name.is_none() {
            self.licence.name = non_empty_env(LEGACY_LICENCE_NAME_ENV);
        }
        if self.licence.key.is_none() {
            self.licence.key = non_empty_env(LEGACY_LICENCE_KEY_ENV);
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
