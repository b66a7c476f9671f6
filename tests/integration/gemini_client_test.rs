// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use medscan::config::settings::LlmSettings;
use medscan::domain::models::extraction::InlineImage;
use medscan::domain::services::llm_service::GeminiService;
use medscan::utils::errors::ModelInvocationError;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-test:generateContent";

fn settings(server: &MockServer, max_retries: u32) -> LlmSettings {
    LlmSettings {
        api_key: Some("test-key".to_string()),
        model: "gemini-test".to_string(),
        api_base_url: format!("{}/v1beta", server.uri()),
        timeout_secs: 1,
        max_retries,
        initial_backoff_ms: 1,
        max_backoff_ms: 5,
    }
}

fn reply(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn sends_prompt_and_inline_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{
                "parts": [
                    { "text": "read this" },
                    { "inline_data": { "mime_type": "image/png", "data": "cG5n" } }
                ]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply("{\"ok\":true}")))
        .expect(1)
        .mount(&server)
        .await;

    let service = GeminiService::new(&settings(&server, 0));
    let image = InlineImage {
        bytes: b"png".to_vec(),
        mime_type: "image/png".to_string(),
    };

    let text = service.invoke("read this", Some(&image)).await.unwrap();
    assert_eq!(text, "{\"ok\":true}");
}

#[tokio::test]
async fn retries_transient_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": { "code": 503, "message": "The model is overloaded" }
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply("recovered")))
        .expect(1)
        .mount(&server)
        .await;

    let service = GeminiService::new(&settings(&server, 2));

    let text = service.invoke("hello", None).await.unwrap();
    assert_eq!(text, "recovered");
}

#[tokio::test]
async fn gives_up_after_max_retries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .expect(3)
        .mount(&server)
        .await;

    let service = GeminiService::new(&settings(&server, 2));

    let error = service.invoke("hello", None).await.unwrap_err();
    assert_eq!(error.status_code(), Some(500));
}

#[tokio::test]
async fn does_not_retry_client_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "API key not valid",
                "details": [{ "reason": "API_KEY_INVALID" }]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = GeminiService::new(&settings(&server, 2));

    let error = service.invoke("hello", None).await.unwrap_err();
    match error {
        ModelInvocationError::Provider {
            status,
            message,
            details,
        } => {
            assert_eq!(status, 400);
            assert_eq!(message, "API key not valid");
            assert_eq!(details.unwrap()[0]["reason"], "API_KEY_INVALID");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn slow_provider_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(reply("too late"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let service = GeminiService::new(&settings(&server, 0));

    let error = service.invoke("hello", None).await.unwrap_err();
    assert!(matches!(error, ModelInvocationError::Timeout(1)));
}

#[tokio::test]
async fn reply_without_text_is_empty_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [] }, "finishReason": "SAFETY" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = GeminiService::new(&settings(&server, 2));

    let error = service.invoke("hello", None).await.unwrap_err();
    assert!(matches!(error, ModelInvocationError::EmptyReply));
}
