// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::settings::Settings;
use crate::domain::repositories::history_repository::HistoryRepository;
use crate::domain::services::extraction_service::ExtractionService;
use crate::domain::services::summary_service::SummaryService;
use crate::presentation::handlers::{extract_handler, history_handler, summary_handler};

/// 路由依赖的服务集合
#[derive(Clone)]
pub struct AppServices {
    pub extraction: Arc<ExtractionService>,
    pub summary: Arc<SummaryService>,
    pub history: Arc<dyn HistoryRepository>,
}

/// 创建应用路由
///
/// # 参数
///
/// * `settings` - 应用配置，使用其中的 API 根路径和上传大小上限
/// * `services` - 注入到处理器的服务
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes(settings: &Settings, services: AppServices) -> Router {
    let api_routes = Router::new()
        .route("/extract", post(extract_handler::extract))
        .route("/summary", post(summary_handler::summary))
        .route(
            "/history",
            post(history_handler::save_history).get(history_handler::list_history),
        )
        .route("/version", get(version))
        .layer(DefaultBodyLimit::max(settings.upload.max_bytes));

    let prefix = settings.server.api_prefix.trim_end_matches('/');
    let router = if prefix.is_empty() {
        Router::new().merge(api_routes)
    } else {
        Router::new().nest(prefix, api_routes)
    };

    router
        .route("/health", get(health_check))
        .layer(Extension(services.extraction))
        .layer(Extension(services.summary))
        .layer(Extension(services.history))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
