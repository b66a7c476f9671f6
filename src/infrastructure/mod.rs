// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施模块
///
/// 提供数据库、暂存区和指标导出等外部集成
pub mod database;
pub mod metrics;
pub mod repositories;
pub mod storage;
