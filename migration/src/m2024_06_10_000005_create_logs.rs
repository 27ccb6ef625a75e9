//! Migration to create the client error log table.
//!
//! Rows are deduplicated by `(level, source, message)`: re-reporting an
//! already-seen error touches `last_seen` and bumps the occurrence counter.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Logs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Logs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Logs::Level).text().not_null())
                    .col(ColumnDef::new(Logs::Source).text().not_null())
                    .col(ColumnDef::new(Logs::Message).text().not_null())
                    .col(ColumnDef::new(Logs::Stack).text().null())
                    .col(ColumnDef::new(Logs::UserAgent).text().null())
                    .col(ColumnDef::new(Logs::FirstSeen).text().not_null())
                    .col(ColumnDef::new(Logs::LastSeen).text().not_null())
                    .col(
                        ColumnDef::new(Logs::Occurrences)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uniq_logs_level_source_message")
                    .table(Logs::Table)
                    .col(Logs::Level)
                    .col(Logs::Source)
                    .col(Logs::Message)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Logs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Logs {
    Table,
    Id,
    Level,
    Source,
    Message,
    Stack,
    UserAgent,
    FirstSeen,
    LastSeen,
    Occurrences,
}
