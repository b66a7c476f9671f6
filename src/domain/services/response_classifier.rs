// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::Value;

use crate::domain::models::extraction::{ExtractionResult, MedicineReport, NOT_MEDICAL_RECORD};

/// 对修复后的文本做严格解析并分类
///
/// # 返回值
/// * `Ok(ExtractionResult)` - 提取成功或领域拒绝
/// * `Err(String)` - 解析失败或形态不符的原因
pub fn classify(repaired: &str) -> Result<ExtractionResult, String> {
    let value: Value =
        serde_json::from_str(repaired).map_err(|e| format!("invalid JSON: {}", e))?;

    let Value::Object(object) = value else {
        return Err("top-level value is not an object".to_string());
    };

    match (object.get("error"), object.contains_key("medicines")) {
        (Some(_), true) => Err("reply mixes error and medicines".to_string()),
        (Some(Value::String(code)), false) if code == NOT_MEDICAL_RECORD => {
            Ok(ExtractionResult::not_medical_record())
        }
        (Some(other), false) => Err(format!("unexpected error value: {}", other)),
        (None, _) => MedicineReport::from_object(object)
            .map(ExtractionResult::Success)
            .map_err(|e| format!("reply does not match the medicines schema: {}", e)),
    }
}
