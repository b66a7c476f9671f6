// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod fake_model;

use axum_test::TestServer;
use medscan::config::settings::Settings;
use medscan::domain::repositories::history_repository::HistoryRepository;
use medscan::domain::services::extraction_service::ExtractionService;
use medscan::domain::services::summary_service::SummaryService;
use medscan::infrastructure::repositories::history_repo_impl::InMemoryHistoryRepository;
use medscan::infrastructure::storage::StagingArea;
use medscan::presentation::routes::{self, AppServices};
use std::sync::Arc;
use tempfile::TempDir;

use fake_model::FakeModel;

#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub model: Arc<FakeModel>,
    pub history: Arc<InMemoryHistoryRepository>,
    // Keep the staging directory alive for the lifetime of the test
    pub staging_dir: TempDir,
}

impl TestApp {
    /// 暂存目录中剩余的文件数
    pub fn staged_files(&self) -> usize {
        std::fs::read_dir(self.staging_dir.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

pub async fn create_test_app(model: FakeModel) -> TestApp {
    create_test_app_with(model, |_| {}).await
}

pub async fn create_test_app_with(
    model: FakeModel,
    configure: impl FnOnce(&mut Settings),
) -> TestApp {
    let mut settings = Settings::defaults().expect("default settings");
    configure(&mut settings);

    let staging_dir = tempfile::tempdir().expect("staging dir");
    let staging = StagingArea::init(staging_dir.path())
        .await
        .expect("staging area");

    let model = Arc::new(model);
    let history = Arc::new(InMemoryHistoryRepository::new());

    let mut extraction = ExtractionService::new(model.clone(), staging);
    if settings.history.record_extractions {
        extraction = extraction.with_history_recording(history.clone());
    }

    let services = AppServices {
        extraction: Arc::new(extraction),
        summary: Arc::new(SummaryService::new(model.clone())),
        history: history.clone() as Arc<dyn HistoryRepository>,
    };

    let server = TestServer::new(routes::routes(&settings, services)).expect("test server");

    TestApp {
        server,
        model,
        history,
        staging_dir,
    }
}
