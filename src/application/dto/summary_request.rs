// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequestDto {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub medicine_name: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SummaryResponseDto {
    pub summary: String,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
