// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ExtractionRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExtractionRecords::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ExtractionRecords::Payload).json().not_null())
                    .col(
                        ColumnDef::new(ExtractionRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_extraction_records_created_at")
                    .table(ExtractionRecords::Table)
                    .col(ExtractionRecords::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ExtractionRecords::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ExtractionRecords {
    Table,
    Id,
    Payload,
    CreatedAt,
}
