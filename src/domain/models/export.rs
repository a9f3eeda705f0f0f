// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 导出格式解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid export_format. Must be 'csv' or 'json'.")]
pub struct InvalidExportFormat;

/// 爬虫导出格式
///
/// 决定传给爬虫的导出参数、结果文件扩展名以及下载时的媒体类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    /// 对应的爬虫命令行参数
    pub fn cli_flag(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "--export-csv",
            ExportFormat::Json => "--export-json",
        }
    }

    /// 结果文件扩展名（不含点）
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// HTTP 下载使用的媒体类型
    pub fn media_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = InvalidExportFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(InvalidExportFormat),
        }
    }
}
