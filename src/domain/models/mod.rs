// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 包含提取结果、药品条目和历史记录等核心实体
pub mod extraction;
pub mod history;
