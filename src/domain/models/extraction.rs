// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// 非医疗图片的哨兵错误值
pub const NOT_MEDICAL_RECORD: &str = "not_medical_record";

/// 成功的提取结果
///
/// 保存模型回复的完整对象，序列化时原样输出（包括化验结果等额外字段）。
/// 构造时只校验外形：`summary` 是字符串，`medicines` 是数组，
/// 每个药品条目都带字符串 `name`；其余字段不做类型约束。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MedicineReport(Map<String, Value>);

impl MedicineReport {
    /// 校验并包装模型回复对象
    ///
    /// # 返回值
    /// * `Err(String)` - 不符合成功结果外形的原因
    pub fn from_object(object: Map<String, Value>) -> Result<Self, String> {
        if !matches!(object.get("summary"), Some(Value::String(_))) {
            return Err("summary is missing or not a string".to_string());
        }

        let medicines = object
            .get("medicines")
            .and_then(Value::as_array)
            .ok_or_else(|| "medicines is missing or not an array".to_string())?;

        for (index, medicine) in medicines.iter().enumerate() {
            if !matches!(medicine.get("name"), Some(Value::String(_))) {
                return Err(format!("medicine #{} has no string name", index));
            }
        }

        Ok(Self(object))
    }

    /// 药品条目，按模型给出的顺序
    pub fn medicines(&self) -> &[Value] {
        self.0
            .get("medicines")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn summary(&self) -> &str {
        self.0
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}

/// 领域拒绝负载 `{"error":"not_medical_record"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub error: String,
}

/// 提取结果
///
/// 只有两种合法形态，序列化后分别为
/// `{"medicines":[...],"summary":"..."}` 和 `{"error":"not_medical_record"}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtractionResult {
    Success(MedicineReport),
    NotMedicalRecord(Rejection),
}

impl ExtractionResult {
    /// 构造领域拒绝结果
    pub fn not_medical_record() -> Self {
        Self::NotMedicalRecord(Rejection {
            error: NOT_MEDICAL_RECORD.to_string(),
        })
    }

    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::NotMedicalRecord(_))
    }

    /// 指标和日志使用的结果标签
    pub fn outcome_label(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::NotMedicalRecord(_) => NOT_MEDICAL_RECORD,
        }
    }
}

/// 上传的图片
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// 图片字节，由请求独占
    pub bytes: Vec<u8>,
    /// 声明或推断出的 MIME 类型
    pub mime_type: String,
    /// 客户端提供的原始文件名
    pub file_name: Option<String>,
}

/// 随提示词一起发送给模型的内联图片
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// 提取流水线阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// 图片已写入暂存区
    Staged,
    /// 模型已调用
    Invoked,
    /// 回复已修复
    Repaired,
    /// 回复已分类
    Classified,
    /// 暂存文件已释放
    Released,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Staged => "staged",
            Self::Invoked => "invoked",
            Self::Repaired => "repaired",
            Self::Classified => "classified",
            Self::Released => "released",
        };
        f.write_str(name)
    }
}

/// 根据文件扩展名推断 MIME 类型
pub fn infer_mime_type(file_name: Option<&str>) -> String {
    let extension = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
    .to_string()
}
