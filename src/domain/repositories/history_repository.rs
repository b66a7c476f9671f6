// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::models::history::HistoryRecord;
use crate::utils::errors::PersistenceError;

/// 历史记录仓库特质
///
/// 提取流水线只依赖这个接口，不关心记录如何落盘
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// 持久化一条提取记录
    async fn persist(&self, payload: Value) -> Result<HistoryRecord, PersistenceError>;
    /// 按创建时间倒序列出最近的记录
    async fn recent(&self, limit: u64) -> Result<Vec<HistoryRecord>, PersistenceError>;
}
