// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::Value;
use thiserror::Error;

/// 模型调用错误类型
#[derive(Error, Debug)]
pub enum ModelInvocationError {
    /// 未配置 API 密钥
    #[error("Model API key not configured")]
    NotConfigured,

    /// 网络传输错误
    #[error("Model request failed: {0}")]
    Transport(String),

    /// 调用超时
    #[error("Model request timed out after {0}s")]
    Timeout(u64),

    /// 提供方返回的错误（配额、鉴权、内部错误等）
    #[error("Model provider returned {status}: {message}")]
    Provider {
        status: u16,
        message: String,
        details: Option<Value>,
    },

    /// 回复中没有文本
    #[error("Model reply contained no text")]
    EmptyReply,

    /// 回复信封无法解析
    #[error("Model reply envelope could not be decoded: {0}")]
    MalformedReply(String),
}

impl ModelInvocationError {
    /// 是否为可重试的瞬时错误
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout(_) => true,
            Self::Provider { status, .. } => *status == 429 || *status >= 500,
            Self::NotConfigured | Self::EmptyReply | Self::MalformedReply(_) => false,
        }
    }

    /// 提供方状态码（如有）
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Provider { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 提供方错误详情（如有）
    pub fn details(&self) -> Option<&Value> {
        match self {
            Self::Provider { details, .. } => details.as_ref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ModelInvocationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::MalformedReply(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// 暂存文件错误类型
#[derive(Error, Debug)]
pub enum StagingError {
    #[error("Staging I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// 提取流水线错误类型
///
/// 领域拒绝（非医疗图片）不是错误，见 `ExtractionResult::NotMedicalRecord`
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// 客户端输入缺失
    #[error("{0}")]
    ClientInput(String),

    /// 模型调用失败
    #[error(transparent)]
    ModelInvocation(#[from] ModelInvocationError),

    /// 模型回复既不是提取结果也不是哨兵值
    #[error("Model reply is not a valid extraction result: {reason}")]
    ResponseFormat { reason: String },

    /// 上传文件暂存失败
    #[error("Failed to stage upload: {0}")]
    Staging(#[from] StagingError),
}

/// 持久化错误类型
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}
