// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use crate::domain::models::extraction::{
    ExtractionResult, ImageUpload, InlineImage, PipelineStage,
};
use crate::domain::repositories::history_repository::HistoryRepository;
use crate::domain::services::llm_service::VisionModel;
use crate::domain::services::{prompt_builder, response_classifier, response_repair};
use crate::infrastructure::storage::{StagedFile, StagingArea};
use crate::utils::errors::ExtractionError;

/// 缺少图片时的客户端错误信息
pub const NO_IMAGE_UPLOADED: &str = "No image uploaded";

/// 提取服务
///
/// 负责一次图片提取的完整流程：暂存 → 调用模型 → 修复回复 → 分类 → 释放暂存文件。
/// 无论哪条路径退出，暂存文件都只释放一次。
pub struct ExtractionService {
    model: Arc<dyn VisionModel>,
    staging: StagingArea,
    history: Option<Arc<dyn HistoryRepository>>,
}

impl ExtractionService {
    pub fn new(model: Arc<dyn VisionModel>, staging: StagingArea) -> Self {
        Self {
            model,
            staging,
            history: None,
        }
    }

    /// 成功的提取结果在后台写入历史记录
    pub fn with_history_recording(mut self, history: Arc<dyn HistoryRepository>) -> Self {
        self.history = Some(history);
        self
    }

    /// 从上传的图片中提取药品信息
    ///
    /// `upload` 为 `None` 或内容为空时视为没有上传图片
    ///
    /// # 返回值
    /// * `Ok(ExtractionResult::Success)` - 识别出的药品和摘要
    /// * `Ok(ExtractionResult::NotMedicalRecord)` - 图片不是医疗文档
    /// * `Err(ExtractionError)` - 输入、模型调用、回复格式或暂存错误
    pub async fn extract(
        &self,
        upload: Option<ImageUpload>,
    ) -> Result<ExtractionResult, ExtractionError> {
        let Some(upload) = upload.filter(|upload| !upload.bytes.is_empty()) else {
            record_outcome(CLIENT_ERROR);
            return Err(ExtractionError::ClientInput(NO_IMAGE_UPLOADED.to_string()));
        };

        let span = tracing::info_span!("extraction", request_id = %Uuid::new_v4());
        async move {
            let staged = self
                .staging
                .stage(&upload.bytes, upload.file_name.as_deref())
                .await
                .inspect_err(|e| warn!(stage = %PipelineStage::Staged, error = %e, "Failed to stage upload"))?;
            debug!(stage = %PipelineStage::Staged, path = %staged.path().display(), "Upload staged");

            let outcome = self.run(&staged, &upload.mime_type).await;

            if let Err(e) = staged.release().await {
                metrics::counter!("medscan_staging_cleanup_failures_total").increment(1);
                warn!(error = %e, "Failed to remove staged upload");
            }
            debug!(stage = %PipelineStage::Released, "Staged upload released");

            let label = match &outcome {
                Ok(result) => result.outcome_label(),
                Err(e) => error_label(e),
            };
            record_outcome(label);
            info!(outcome = label, "Extraction finished");

            if let Ok(result @ ExtractionResult::Success(_)) = &outcome {
                self.record_history(result);
            }

            outcome
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        staged: &StagedFile,
        mime_type: &str,
    ) -> Result<ExtractionResult, ExtractionError> {
        let bytes = staged
            .read()
            .await
            .inspect_err(|e| warn!(stage = %PipelineStage::Staged, error = %e, "Failed to read staged upload"))?;
        let image = InlineImage {
            bytes,
            mime_type: mime_type.to_string(),
        };

        let prompt = prompt_builder::extraction_prompt();
        let raw = self
            .model
            .invoke(&prompt, Some(&image))
            .await
            .inspect_err(|e| warn!(stage = %PipelineStage::Invoked, error = %e, "Model invocation failed"))?;
        debug!(stage = %PipelineStage::Invoked, reply_len = raw.len(), "Model replied");

        let repaired = response_repair::repair(&raw);
        debug!(stage = %PipelineStage::Repaired, repaired_len = repaired.len(), "Reply repaired");

        let result = response_classifier::classify(repaired).map_err(|reason| {
            warn!(
                stage = %PipelineStage::Classified,
                %reason,
                raw = %raw,
                repaired = %repaired,
                "Model reply failed validation"
            );
            ExtractionError::ResponseFormat { reason }
        })?;
        debug!(stage = %PipelineStage::Classified, outcome = result.outcome_label(), "Reply classified");

        Ok(result)
    }

    fn record_history(&self, result: &ExtractionResult) {
        let Some(history) = self.history.clone() else {
            return;
        };
        let payload = match serde_json::to_value(result) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Failed to serialize extraction for history");
                return;
            }
        };

        tokio::spawn(
            async move {
                if let Err(e) = history.persist(payload).await {
                    warn!(error = %e, "Failed to record extraction history");
                }
            }
            .in_current_span(),
        );
    }
}

/// 客户端输入错误的结果标签
pub const CLIENT_ERROR: &str = "client_error";

/// 记录一次提取结果到 `medscan_extractions_total`
pub fn record_outcome(outcome: &'static str) {
    metrics::counter!("medscan_extractions_total", "outcome" => outcome).increment(1);
}

fn error_label(error: &ExtractionError) -> &'static str {
    match error {
        ExtractionError::ClientInput(_) => CLIENT_ERROR,
        ExtractionError::ModelInvocation(_) => "model_error",
        ExtractionError::ResponseFormat { .. } => "format_error",
        ExtractionError::Staging(_) => "staging_error",
    }
}
