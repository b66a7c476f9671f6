// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use medscan::domain::models::extraction::InlineImage;
use medscan::domain::services::llm_service::VisionModel;
use medscan::utils::errors::ModelInvocationError;
use std::collections::VecDeque;
use std::sync::Mutex;

/// 记录到的一次模型调用
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prompt: String,
    pub image: Option<InlineImage>,
}

/// 按顺序返回预设回复的模型
pub struct FakeModel {
    replies: Mutex<VecDeque<Result<String, ModelInvocationError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

#[allow(dead_code)]
impl FakeModel {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new().then_reply(Ok(text.to_string()))
    }

    pub fn failing(error: ModelInvocationError) -> Self {
        Self::new().then_reply(Err(error))
    }

    pub fn then_reply(self, reply: Result<String, ModelInvocationError>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl VisionModel for FakeModel {
    async fn invoke(
        &self,
        prompt: &str,
        image: Option<&InlineImage>,
    ) -> Result<String, ModelInvocationError> {
        self.calls.lock().unwrap().push(RecordedCall {
            prompt: prompt.to_string(),
            image: image.cloned(),
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ModelInvocationError::EmptyReply))
    }
}
