// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart,
    },
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;
use tracing::{error, warn};

use crate::domain::models::extraction::{infer_mime_type, ImageUpload};
use crate::domain::services::extraction_service::{
    record_outcome, ExtractionService, CLIENT_ERROR,
};
use crate::presentation::errors::AppError;

/// 图片上传的表单字段名
pub const IMAGE_FIELD: &str = "image";

/// 从上传的处方图片中提取药品信息
///
/// 成功和非医疗文档两种结果都以 200 返回，结构不同
pub async fn extract(
    Extension(service): Extension<Arc<ExtractionService>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, AppError> {
    let upload = match multipart {
        Ok(multipart) => read_image_field(multipart)
            .await
            .inspect_err(|_| record_outcome(CLIENT_ERROR))?,
        Err(rejection) => {
            warn!("Rejected non-multipart upload: {}", rejection);
            None
        }
    };

    match service.extract(upload).await {
        Ok(result) => Ok((StatusCode::OK, Json(result))),
        Err(e) => {
            error!("Extraction failed: {}", e);
            Err(AppError::from_extraction(e))
        }
    }
}

/// 读取 `image` 字段，其余字段忽略
///
/// 缺少字段或表单损坏时返回 `None`，由提取服务按未上传处理；只有超出大小上限才直接报错
async fn read_image_field(mut multipart: Multipart) -> Result<Option<ImageUpload>, AppError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(e) => return malformed_multipart(e),
        };
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let mime_type = field
            .content_type()
            .filter(|ct| !ct.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| infer_mime_type(file_name.as_deref()));

        return match field.bytes().await {
            Ok(bytes) => Ok(Some(ImageUpload {
                bytes: bytes.to_vec(),
                mime_type,
                file_name,
            })),
            Err(e) => malformed_multipart(e),
        };
    }
}

fn malformed_multipart(e: MultipartError) -> Result<Option<ImageUpload>, AppError> {
    let status = e.status();
    warn!("Malformed multipart body: {}", e.body_text());
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        Err(AppError::new(status, "Image exceeds the upload size limit"))
    } else {
        Ok(None)
    }
}
