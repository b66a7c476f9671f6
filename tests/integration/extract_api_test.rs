// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use medscan::utils::errors::ModelInvocationError;
use serde_json::{json, Value};

use super::helpers::fake_model::FakeModel;
use super::helpers::{create_test_app, create_test_app_with};

const PRESCRIPTION_REPLY: &str = r#"{"medicines":[{"name":"Amoxicillin","dosage":"500mg","frequency":"3 times a day","duration":"7 days"}],"summary":"Antibiotic course for a bacterial infection."}"#;

fn image_form(bytes: &[u8]) -> MultipartForm {
    MultipartForm::new().add_part(
        "image",
        Part::bytes(bytes.to_vec())
            .file_name("prescription.jpg")
            .mime_type("image/jpeg"),
    )
}

/// 成功提取：返回药品列表和摘要，图片随提示词一起发送
#[tokio::test]
async fn extract_returns_medicines_and_cleans_staging() {
    let app = create_test_app(FakeModel::replying(PRESCRIPTION_REPLY)).await;

    let response = app
        .server
        .post("/api/extract")
        .multipart(image_form(b"jpeg-bytes"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        serde_json::from_str::<Value>(PRESCRIPTION_REPLY).unwrap()
    );
    assert_eq!(response.text(), PRESCRIPTION_REPLY);

    let calls = app.model.calls();
    assert_eq!(calls.len(), 1);
    let image = calls[0].image.as_ref().expect("image sent to model");
    assert_eq!(image.bytes, b"jpeg-bytes");
    assert_eq!(image.mime_type, "image/jpeg");
    assert!(calls[0].prompt.contains("not_medical_record"));

    assert_eq!(app.staged_files(), 0);
}

/// 化验单等额外字段和显式 null 原样透传
#[tokio::test]
async fn extract_passes_lab_report_fields_through() {
    let reply = r#"{"medicines":[{"name":"Metformin","dosage":500,"frequency":"BID","duration":"30 days","instructions":null,"route":"oral"}],"summary":"Type 2 diabetes follow-up.","tests":[{"name":"HbA1c","value":"6.1%","range":"4.0-5.6%"}]}"#;
    let app = create_test_app(FakeModel::replying(&format!("```json\n{}\n```", reply))).await;

    let response = app
        .server
        .post("/api/extract")
        .multipart(image_form(b"lab-report"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), reply);
    assert_eq!(app.staged_files(), 0);
}

/// 缺少图片字段：400，不调用模型，不产生暂存文件
#[tokio::test]
async fn extract_without_image_is_bad_request() {
    let app = create_test_app(FakeModel::replying(PRESCRIPTION_REPLY)).await;

    let form = MultipartForm::new().add_text("note", "no image here");
    let response = app.server.post("/api/extract").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "No image uploaded" })
    );
    assert_eq!(app.model.call_count(), 0);
    assert_eq!(app.staged_files(), 0);
}

#[tokio::test]
async fn extract_with_empty_image_is_bad_request() {
    let app = create_test_app(FakeModel::replying(PRESCRIPTION_REPLY)).await;

    let response = app
        .server
        .post("/api/extract")
        .multipart(image_form(b""))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "No image uploaded");
    assert_eq!(app.model.call_count(), 0);
}

#[tokio::test]
async fn extract_with_json_body_is_bad_request() {
    let app = create_test_app(FakeModel::replying(PRESCRIPTION_REPLY)).await;

    let response = app
        .server
        .post("/api/extract")
        .json(&json!({ "image": "not a file" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "No image uploaded");
    assert_eq!(app.model.call_count(), 0);
}

/// 非医疗图片：哨兵值原样返回，状态码 200
#[tokio::test]
async fn extract_non_medical_image_returns_sentinel() {
    let app = create_test_app(FakeModel::replying(
        "```json\n{\"error\": \"not_medical_record\"}\n```",
    ))
    .await;

    let response = app
        .server
        .post("/api/extract")
        .multipart(image_form(b"a-photo-of-a-cat"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), r#"{"error":"not_medical_record"}"#);
    assert_eq!(app.staged_files(), 0);
}

/// 回复被代码块包裹时修复后仍能解析
#[tokio::test]
async fn extract_repairs_fenced_reply() {
    let fenced = format!("Here is the result:\n```json\n{}\n```\nHope this helps.", PRESCRIPTION_REPLY);
    let app = create_test_app(FakeModel::replying(&fenced)).await;

    let response = app
        .server
        .post("/api/extract")
        .multipart(image_form(b"jpeg-bytes"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["medicines"][0]["name"], "Amoxicillin");
}

/// 无法解析的回复：500，响应中不泄露模型原文
#[tokio::test]
async fn extract_unparseable_reply_is_server_error() {
    let app = create_test_app(FakeModel::replying(
        "Sorry, I cannot read this prescription clearly.",
    ))
    .await;

    let response = app
        .server
        .post("/api/extract")
        .multipart(image_form(b"blurry"))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["error"].is_string());
    assert!(!response.text().contains("cannot read this prescription"));
    assert_eq!(app.staged_files(), 0);
}

#[tokio::test]
async fn extract_model_failure_is_server_error_with_details() {
    let app = create_test_app(FakeModel::failing(ModelInvocationError::Transport(
        "connection reset by peer".to_string(),
    )))
    .await;

    let response = app
        .server
        .post("/api/extract")
        .multipart(image_form(b"jpeg-bytes"))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "Failed to process image");
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("connection reset by peer"));
    assert_eq!(app.staged_files(), 0);
}

#[tokio::test]
async fn extract_forwards_provider_status() {
    let app = create_test_app(FakeModel::failing(ModelInvocationError::Provider {
        status: 429,
        message: "Resource has been exhausted".to_string(),
        details: None,
    }))
    .await;

    let response = app
        .server
        .post("/api/extract")
        .multipart(image_form(b"jpeg-bytes"))
        .await;

    assert_eq!(response.status_code(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(app.staged_files(), 0);
}

#[tokio::test]
async fn extract_rejects_oversized_upload() {
    let app = create_test_app_with(FakeModel::replying(PRESCRIPTION_REPLY), |settings| {
        settings.upload.max_bytes = 1024;
    })
    .await;

    let response = app
        .server
        .post("/api/extract")
        .multipart(image_form(&vec![0u8; 8 * 1024]))
        .await;

    assert!(response.status_code().is_client_error());
    assert_eq!(app.model.call_count(), 0);
    assert_eq!(app.staged_files(), 0);
}

#[tokio::test]
async fn extract_records_history_when_enabled() {
    let app = create_test_app_with(FakeModel::replying(PRESCRIPTION_REPLY), |settings| {
        settings.history.record_extractions = true;
    })
    .await;

    let response = app
        .server
        .post("/api/extract")
        .multipart(image_form(b"jpeg-bytes"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    // Recording runs in a background task.
    for _ in 0..50 {
        if !app.history.is_empty().await {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(app.history.len().await, 1);
}

#[tokio::test]
async fn extract_respects_custom_api_prefix() {
    let app = create_test_app_with(FakeModel::replying(PRESCRIPTION_REPLY), |settings| {
        settings.server.api_prefix = "/v2".to_string();
    })
    .await;

    let response = app
        .server
        .post("/v2/extract")
        .multipart(image_form(b"jpeg-bytes"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = app
        .server
        .post("/api/extract")
        .multipart(image_form(b"jpeg-bytes"))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
