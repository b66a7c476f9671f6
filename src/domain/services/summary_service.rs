// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tracing::info;

use crate::domain::services::llm_service::VisionModel;
use crate::domain::services::prompt_builder;
use crate::utils::errors::ExtractionError;

/// 缺少药品名称时的客户端错误信息
pub const MEDICINE_NAME_REQUIRED: &str = "Medicine name is required";

/// 药品摘要服务
///
/// 只发送文本提示词，模型回复按原样作为摘要返回，不做修复或校验
pub struct SummaryService {
    model: Arc<dyn VisionModel>,
}

impl SummaryService {
    pub fn new(model: Arc<dyn VisionModel>) -> Self {
        Self { model }
    }

    /// 生成药品摘要
    ///
    /// # 错误
    /// * 药品名称为空白时返回 `ClientInput`
    /// * 模型调用失败时返回 `ModelInvocation`
    pub async fn summarize(&self, medicine_name: &str) -> Result<String, ExtractionError> {
        let medicine_name = medicine_name.trim();
        if medicine_name.is_empty() {
            return Err(ExtractionError::ClientInput(
                MEDICINE_NAME_REQUIRED.to_string(),
            ));
        }

        info!(medicine = medicine_name, "Generating medicine summary");
        let prompt = prompt_builder::summary_prompt(medicine_name);
        Ok(self.model.invoke(&prompt, None).await?)
    }
}
