// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 配置文件上传响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigUploadDto {
    pub message: String,
}

/// 配置文件列表响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigListDto {
    pub config_files: Vec<String>,
}
