// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::rejection::JsonRejection, response::IntoResponse, Extension, Json};
use std::sync::Arc;
use tracing::error;
use validator::Validate;

use crate::application::dto::summary_request::{SummaryRequestDto, SummaryResponseDto};
use crate::domain::services::summary_service::{SummaryService, MEDICINE_NAME_REQUIRED};
use crate::presentation::errors::AppError;

/// 生成药品摘要
pub async fn summary(
    Extension(service): Extension<Arc<SummaryService>>,
    payload: Result<Json<SummaryRequestDto>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.map_err(|_| AppError::bad_request(MEDICINE_NAME_REQUIRED))?;
    payload
        .validate()
        .map_err(|_| AppError::bad_request(MEDICINE_NAME_REQUIRED))?;

    let summary = service
        .summarize(&payload.medicine_name)
        .await
        .map_err(|e| {
            error!("Summary generation failed: {}", e);
            AppError::from_summary(e)
        })?;

    Ok(Json(SummaryResponseDto { summary }))
}
