// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use medscan::config::settings::Settings;
use medscan::domain::repositories::history_repository::HistoryRepository;
use medscan::domain::services::extraction_service::ExtractionService;
use medscan::domain::services::llm_service::{GeminiService, VisionModel};
use medscan::domain::services::summary_service::SummaryService;
use medscan::infrastructure::database::connection;
use medscan::infrastructure::metrics::init_metrics;
use medscan::infrastructure::repositories::history_repo_impl::HistoryRepositoryImpl;
use medscan::infrastructure::storage::StagingArea;
use medscan::presentation::routes::{self, AppServices};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use medscan::utils::telemetry;
use migration::{Migrator, MigratorTrait};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting medscan...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    init_metrics(&settings.metrics);

    // 3. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Prepare the staging directory
    let staging = StagingArea::init(&settings.upload.staging_dir).await?;
    info!("Staging directory: {}", staging.base_path().display());

    // 5. Initialize services
    if settings.llm.api_key.is_none() {
        warn!("No model API key configured; /extract and /summary will fail");
    }
    let model: Arc<dyn VisionModel> = Arc::new(GeminiService::new(&settings.llm));
    let history: Arc<dyn HistoryRepository> = Arc::new(HistoryRepositoryImpl::new(db.clone()));

    let mut extraction = ExtractionService::new(model.clone(), staging);
    if settings.history.record_extractions {
        extraction = extraction.with_history_recording(history.clone());
        info!("Successful extractions will be recorded to history");
    }

    let services = AppServices {
        extraction: Arc::new(extraction),
        summary: Arc::new(SummaryService::new(model)),
        history,
    };

    // 6. Start server
    let app = routes::routes(&settings, services);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
