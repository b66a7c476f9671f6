// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// 历史记录实体
///
/// 保存一次提取结果的不透明快照，内容由调用方决定。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// 记录唯一标识符
    pub id: Uuid,
    /// 提取记录负载
    pub payload: Value,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl HistoryRecord {
    /// 创建一个新的历史记录
    pub fn new(payload: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            payload,
            created_at: Utc::now(),
        }
    }
}
