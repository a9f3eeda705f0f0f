// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// - 爬取任务仓库（crawl_repository）：任务记录的存取
/// - 配置仓库（config_repository）：`.seospider` 配置文件的存取
pub mod config_repository;
pub mod crawl_repository;
