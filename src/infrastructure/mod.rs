// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节，负责与文件系统和外部进程交互。
///
/// 包含的子模块：
/// - 许可证（licence）：为爬虫写入许可证文件
/// - 可观测性（observability）：Prometheus 指标
/// - 仓库实现（repositories）：领域仓库接口的具体实现
/// - 结果（results）：在输出目录中查找导出文件
/// - 存储（storage）：`.seospider` 配置文件存储
///
/// 基础设施层依赖于领域层的抽象接口。
pub mod licence;
pub mod observability;
pub mod repositories;
pub mod results;
pub mod storage;
