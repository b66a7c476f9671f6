// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use sea_orm::*;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::models::history::HistoryRecord;
use crate::domain::repositories::history_repository::HistoryRepository;
use crate::infrastructure::database::entities::extraction_record;
use crate::utils::errors::PersistenceError;

/// 历史记录仓库实现（关系型数据库）
#[derive(Clone)]
pub struct HistoryRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl HistoryRepositoryImpl {
    /// 创建新的历史记录仓库实现
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HistoryRepository for HistoryRepositoryImpl {
    async fn persist(&self, payload: Value) -> Result<HistoryRecord, PersistenceError> {
        let record = HistoryRecord::new(payload);
        let model = extraction_record::ActiveModel {
            id: Set(record.id),
            payload: Set(record.payload.clone()),
            created_at: Set(record.created_at.into()),
        };

        model.insert(self.db.as_ref()).await?;
        Ok(record)
    }

    async fn recent(&self, limit: u64) -> Result<Vec<HistoryRecord>, PersistenceError> {
        let models = extraction_record::Entity::find()
            .order_by_desc(extraction_record::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}

impl From<extraction_record::Model> for HistoryRecord {
    fn from(model: extraction_record::Model) -> Self {
        Self {
            id: model.id,
            payload: model.payload,
            created_at: model.created_at.into(),
        }
    }
}

/// 内存历史记录仓库（用于测试和无数据库部署）
#[derive(Clone, Default)]
pub struct InMemoryHistoryRepository {
    records: Arc<RwLock<Vec<HistoryRecord>>>,
}

impl InMemoryHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistoryRepository {
    async fn persist(&self, payload: Value) -> Result<HistoryRecord, PersistenceError> {
        let record = HistoryRecord::new(payload);
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn recent(&self, limit: u64) -> Result<Vec<HistoryRecord>, PersistenceError> {
        let records = self.records.read().await;
        Ok(records.iter().rev().take(limit as usize).cloned().collect())
    }
}
