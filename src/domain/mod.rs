// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：提取结果、药品条目、历史记录
/// - 仓库接口（repositories）：历史记录持久化抽象接口
/// - 服务（services）：提示词构建、回复修复、提取流水线、摘要服务
pub mod models;
pub mod repositories;
pub mod services;
