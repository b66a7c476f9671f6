// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 提取服务（extraction_service）：暂存、调用模型、修复、分类和清理的完整流水线
/// - 模型服务（llm_service）：生成式模型调用接口及 Gemini 实现
/// - 提示词构建（prompt_builder）：提取契约和摘要提示词
/// - 回复修复（response_repair）：从自由文本中截取内嵌 JSON
/// - 回复分类（response_classifier）：区分提取结果、哨兵值和无效回复
/// - 摘要服务（summary_service）：药品文字摘要
pub mod extraction_service;
pub mod llm_service;
pub mod prompt_builder;
pub mod response_classifier;
pub mod response_repair;
pub mod summary_service;
