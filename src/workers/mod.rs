// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 执行爬取任务并管理后台任务的并发与取消
pub mod crawl_worker;
pub mod manager;
