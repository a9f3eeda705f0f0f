// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 爬取引擎模块
///
/// 定义爬取引擎特质，并提供调用外部 SEO Spider 命令行的实现
pub mod seospider_engine;
pub mod traits;
