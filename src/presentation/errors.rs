// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::utils::errors::{ExtractionError, ModelInvocationError, PersistenceError};

/// 应用错误类型
///
/// 统一的 HTTP 错误响应：`{"error": ..., "details": ...}`，`details` 可省略
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    body: ErrorBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    provider_details: Option<Value>,
}

impl AppError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: error.into(),
                details: None,
                provider_details: None,
            },
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    fn with_details(mut self, details: impl Into<String>) -> Self {
        self.body.details = Some(details.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// `/extract` 的错误映射：500 响应带 `details`，模型原文只写日志
    pub fn from_extraction(error: ExtractionError) -> Self {
        match error {
            ExtractionError::ClientInput(message) => Self::bad_request(message),
            ExtractionError::ModelInvocation(e) => {
                let mut app_error = Self::new(model_status(&e), "Failed to process image")
                    .with_details(e.to_string());
                app_error.body.provider_details = e.details().cloned();
                app_error
            }
            ExtractionError::ResponseFormat { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to parse AI response",
            )
            .with_details("The model reply was not a valid extraction result"),
            ExtractionError::Staging(e) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to process image")
                    .with_details(e.to_string())
            }
        }
    }

    /// `/summary` 的错误映射：只有 `error` 字段
    pub fn from_summary(error: ExtractionError) -> Self {
        match error {
            ExtractionError::ClientInput(message) => Self::bad_request(message),
            ExtractionError::ModelInvocation(e) => Self::new(
                model_status(&e),
                format!("Failed to generate summary: {}", e),
            ),
            other => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to generate summary: {}", other),
            ),
        }
    }
}

/// 提供方状态码可用时沿用，否则为 500
fn model_status(error: &ModelInvocationError) -> StatusCode {
    error
        .status_code()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .filter(|status| status.is_client_error() || status.is_server_error())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl From<PersistenceError> for AppError {
    fn from(error: PersistenceError) -> Self {
        tracing::error!(error = %error, "History persistence failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save history")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
