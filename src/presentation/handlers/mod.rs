// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// HTTP请求处理器模块
///
/// 每个处理器负责一个API端点，业务逻辑委托给领域服务
pub mod extract_handler;
pub mod history_handler;
pub mod summary_handler;
