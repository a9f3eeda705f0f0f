// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 用例模块
///
/// 爬取任务与爬虫配置文件的业务流程
pub mod config_use_case;
pub mod crawl_use_case;
