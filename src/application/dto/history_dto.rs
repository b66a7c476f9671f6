// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::history::HistoryRecord;

#[derive(Debug, Deserialize, Serialize)]
pub struct HistorySavedDto {
    pub success: bool,
    pub message: String,
    pub id: Uuid,
}

impl From<&HistoryRecord> for HistorySavedDto {
    fn from(record: &HistoryRecord) -> Self {
        Self {
            success: true,
            message: "History saved successfully".to_string(),
            id: record.id,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct HistoryQueryDto {
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct HistoryListDto {
    pub records: Vec<HistoryRecord>,
}
