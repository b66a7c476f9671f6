// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::settings::LlmSettings;
use crate::domain::models::extraction::InlineImage;
use crate::utils::errors::ModelInvocationError;
use crate::utils::retry_policy::RetryPolicy;

/// 生成式模型调用接口
///
/// 给定提示词和可选的内联图片，返回模型的原始文本回复
#[async_trait]
pub trait VisionModel: Send + Sync {
    async fn invoke(
        &self,
        prompt: &str,
        image: Option<&InlineImage>,
    ) -> Result<String, ModelInvocationError>;
}

/// Gemini 服务 - 处理与 Google Generative Language API 的交互
///
/// # 功能
///
/// 以 `generateContent` 接口发送文本和 base64 编码的内联图片，
/// 瞬时故障按重试策略退避重试，每次调用都有独立超时
pub struct GeminiService {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    api_base_url: String,
    timeout: Duration,
    retry_policy: RetryPolicy,
}

#[async_trait]
impl VisionModel for GeminiService {
    async fn invoke(
        &self,
        prompt: &str,
        image: Option<&InlineImage>,
    ) -> Result<String, ModelInvocationError> {
        GeminiService::invoke(self, prompt, image).await
    }
}

impl GeminiService {
    pub fn new(settings: &LlmSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key: settings.api_key.clone().filter(|key| !key.is_empty()),
            model: settings.model.clone(),
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            timeout: settings.timeout(),
            retry_policy: RetryPolicy::from_settings(settings),
        }
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// 调用模型并返回原始文本
    ///
    /// # 错误
    /// * 未配置 API 密钥时返回 `NotConfigured`
    /// * 重试耗尽后返回最后一次的调用错误
    pub async fn invoke(
        &self,
        prompt: &str,
        image: Option<&InlineImage>,
    ) -> Result<String, ModelInvocationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ModelInvocationError::NotConfigured)?;

        let body = Self::request_body(prompt, image);
        let mut attempt = 0u32;

        loop {
            let started = Instant::now();
            let result = self.generate(api_key, &body).await;
            metrics::histogram!("medscan_model_latency_seconds")
                .record(started.elapsed().as_secs_f64());

            match result {
                Ok(text) => return Ok(text),
                Err(e) if e.is_transient() && self.retry_policy.should_retry(attempt) => {
                    attempt += 1;
                    let backoff = self.retry_policy.calculate_backoff(attempt);
                    warn!(
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "Transient model failure, retrying"
                    );
                    metrics::counter!("medscan_model_retries_total").increment(1);
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn request_body(prompt: &str, image: Option<&InlineImage>) -> Value {
        let mut parts = vec![json!({ "text": prompt })];
        if let Some(image) = image {
            parts.push(json!({
                "inline_data": {
                    "mime_type": image.mime_type,
                    "data": BASE64.encode(&image.bytes),
                }
            }));
        }

        json!({
            "contents": [{ "parts": parts }],
            "generationConfig": { "temperature": 0.1 }
        })
    }

    async fn generate(&self, api_key: &str, body: &Value) -> Result<String, ModelInvocationError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.api_base_url, self.model
        );
        debug!(model = %self.model, "Calling generative model");

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ModelInvocationError::Timeout(self.timeout.as_secs())
                } else {
                    ModelInvocationError::from(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::provider_error(status.as_u16(), &error_text));
        }

        let reply: Value = response.json().await?;
        Self::reply_text(&reply)
    }

    /// 从提供方错误体中取出 `error.message` 和 `error.details`
    fn provider_error(status: u16, body: &str) -> ModelInvocationError {
        let parsed = serde_json::from_str::<Value>(body).ok();
        let error = parsed.as_ref().and_then(|v| v.get("error"));

        let message = error
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| body.chars().take(500).collect());
        let details = error.and_then(|e| e.get("details")).cloned();

        ModelInvocationError::Provider {
            status,
            message,
            details,
        }
    }

    /// 拼接第一个候选回复中的全部文本片段
    fn reply_text(reply: &Value) -> Result<String, ModelInvocationError> {
        let parts = reply["candidates"][0]["content"]["parts"]
            .as_array()
            .ok_or(ModelInvocationError::EmptyReply)?;

        let text: String = parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect();

        if text.trim().is_empty() {
            Err(ModelInvocationError::EmptyReply)
        } else {
            Ok(text)
        }
    }
}
