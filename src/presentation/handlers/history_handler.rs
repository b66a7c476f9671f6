// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query,
    },
    response::IntoResponse,
    Extension, Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::dto::history_dto::{HistoryListDto, HistoryQueryDto, HistorySavedDto};
use crate::domain::repositories::history_repository::HistoryRepository;
use crate::presentation::errors::AppError;

pub const INVALID_HISTORY_PAYLOAD: &str = "Invalid history payload";
pub const INVALID_HISTORY_LIMIT: &str = "limit must be a positive integer";

/// 默认返回的历史记录条数
const DEFAULT_HISTORY_LIMIT: u64 = 20;
/// 单次查询的最大条数
const MAX_HISTORY_LIMIT: u64 = 100;

/// 保存一条提取记录
///
/// 请求体按不透明 JSON 存储，不做结构校验
pub async fn save_history(
    Extension(repo): Extension<Arc<dyn HistoryRepository>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!("Rejected history payload: {}", rejection);
        AppError::bad_request(INVALID_HISTORY_PAYLOAD)
    })?;

    let record = repo.persist(payload).await?;
    info!(id = %record.id, "History record saved");

    Ok(Json(HistorySavedDto::from(&record)))
}

/// 列出最近的提取记录，按时间倒序
pub async fn list_history(
    Extension(repo): Extension<Arc<dyn HistoryRepository>>,
    query: Result<Query<HistoryQueryDto>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(query) = query.map_err(|rejection| {
        warn!("Rejected history query: {}", rejection);
        AppError::bad_request(INVALID_HISTORY_LIMIT)
    })?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);

    let records = repo.recent(limit).await?;
    Ok(Json(HistoryListDto { records }))
}
