// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 爬取任务与配置文件的用例及数据传输对象
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含爬取任务实体和仓库接口
pub mod domain;

/// 引擎模块
///
/// 调用外部 SEO Spider 进程的爬取引擎
pub mod engines;

/// 基础设施模块
///
/// 任务清单持久化、配置文件存储、许可证、结果文件查找和指标
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由和处理器
pub mod presentation;

/// 工具模块
///
/// 日志初始化与工作器错误类型
pub mod utils;

/// 工作器模块
///
/// 后台执行爬取任务并限制并发
pub mod workers;
