//! Migration to create the support tickets table.
//!
//! `ticket_id` is the caller-supplied primary key; a duplicate insert is a
//! unique-constraint violation surfaced to the client as a conflict.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tickets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tickets::TicketId)
                            .text()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tickets::Subject).text().not_null())
                    .col(ColumnDef::new(Tickets::Category).text().null())
                    .col(ColumnDef::new(Tickets::Description).text().null())
                    .col(ColumnDef::new(Tickets::Region).text().null())
                    .col(ColumnDef::new(Tickets::District).text().null())
                    .col(ColumnDef::new(Tickets::Status).text().not_null())
                    .col(ColumnDef::new(Tickets::Priority).text().null())
                    .col(ColumnDef::new(Tickets::ConsumerUid).text().null())
                    .col(ColumnDef::new(Tickets::ConsumerName).text().null())
                    .col(ColumnDef::new(Tickets::LastUpdated).text().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tickets::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Tickets {
    Table,
    TicketId,
    Subject,
    Category,
    Description,
    Region,
    District,
    Status,
    Priority,
    ConsumerUid,
    ConsumerName,
    LastUpdated,
}
