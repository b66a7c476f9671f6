// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 提示词构建
//!
//! 提取契约以纯文本形式交给模型，内容固定，便于脱离模型单独测试。

use crate::domain::models::extraction::NOT_MEDICAL_RECORD;

const EXTRACTION_PROMPT: &str = r#"You are a medical document analyst. Analyze the attached image of a prescription or lab report.

Tasks:
1. Identify all medicines along with their dosages, frequencies and durations.
2. Auto-correct misspelled medicine names to their canonical, correctly spelled form.
3. Infer the intended usage from colloquial or abbreviated instructions (for example "1-0-1" means one in the morning and one at night).
4. Output ONLY raw JSON. Do not add any preamble, explanation or markdown code fences.
5. Write the summary in a direct, professional tone. Do not include disclaimers or advice to consult a doctor.
6. If the image is not a medical record, output exactly {"error": "__SENTINEL__"} and nothing else.

Respond with a single JSON object of this shape:
{
  "medicines": [
    {
      "name": "corrected medicine name",
      "dosage": "e.g. 500mg",
      "frequency": "e.g. twice a day",
      "duration": "e.g. 5 days",
      "instructions": "e.g. after meals"
    }
  ],
  "summary": "short professional summary of the prescription or report"
}"#;

/// 构建图片提取提示词
pub fn extraction_prompt() -> String {
    EXTRACTION_PROMPT.replace("__SENTINEL__", NOT_MEDICAL_RECORD)
}

/// 构建药品摘要提示词
pub fn summary_prompt(medicine_name: &str) -> String {
    format!(
        "Provide a professional, concise summary of the medicine \"{}\". \
        Cover its primary uses, common side effects and key precautions. \
        Be direct and do not include disclaimers.",
        medicine_name.trim()
    )
}
