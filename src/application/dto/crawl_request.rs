// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

pub const DEFAULT_EXPORT_FORMAT: &str = "csv";
pub const DEFAULT_EXPORT_TYPE: &str = "all_links";

/// 创建爬取任务的请求体
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CrawlRequestDto {
    /// 起始URL，必须是 http/https 绝对地址
    #[validate(custom(function = "validate_http_url"))]
    pub url: String,
    /// 省略时使用服务配置的默认配置文件
    #[serde(default)]
    pub config_file: Option<String>,
    /// `csv` 或 `json`，在用例中解析
    #[serde(default = "default_export_format")]
    pub export_format: String,
    /// 传给 `--export-csv`/`--export-json` 的导出类型
    #[validate(
        length(min = 1, max = 128, message = "export_type must be 1-128 characters"),
        custom(function = "validate_export_type")
    )]
    #[serde(default = "default_export_type")]
    pub export_type: String,
}

fn default_export_format() -> String {
    DEFAULT_EXPORT_FORMAT.to_string()
}

fn default_export_type() -> String {
    DEFAULT_EXPORT_TYPE.to_string()
}

fn validate_http_url(value: &str) -> Result<(), ValidationError> {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => Ok(()),
        _ => Err(ValidationError::new("url")
            .with_message(Cow::Borrowed("url must be an absolute http or https URL"))),
    }
}

/// 导出类型会成为命令行参数，只允许字母、数字和 `_:-`
fn validate_export_type(value: &str) -> Result<(), ValidationError> {
    if value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '-'))
    {
        Ok(())
    } else {
        Err(ValidationError::new("export_type").with_message(Cow::Borrowed(
            "export_type may only contain letters, digits, '_', ':' and '-'",
        )))
    }
}
