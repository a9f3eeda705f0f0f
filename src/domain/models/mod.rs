// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 爬取任务（crawl）：一次外部爬虫调用及其生命周期
/// - 导出格式（export）：爬虫结果的导出方式
pub mod crawl;
pub mod export;
