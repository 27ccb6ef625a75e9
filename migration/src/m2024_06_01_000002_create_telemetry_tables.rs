//! Migration to create the meter telemetry tables.
//!
//! `d2` holds instantaneous power-quality readings, `d3_b3` holds cumulative
//! energy registers. Both are keyed by meter serial and a formatted
//! `YYYY-MM-DD HH:MM:SS` timestamp written by the external meter loaders.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(D2::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(D2::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(D2::MeterSerial).text().not_null())
                    .col(ColumnDef::new(D2::Ts).text().not_null())
                    .col(ColumnDef::new(D2::VoltageR).double().null())
                    .col(ColumnDef::new(D2::VoltageY).double().null())
                    .col(ColumnDef::new(D2::VoltageB).double().null())
                    .col(ColumnDef::new(D2::CurrentR).double().null())
                    .col(ColumnDef::new(D2::CurrentY).double().null())
                    .col(ColumnDef::new(D2::CurrentB).double().null())
                    .col(ColumnDef::new(D2::NeutralCurrent).double().null())
                    .col(ColumnDef::new(D2::PowerFactor).double().null())
                    .col(ColumnDef::new(D2::Frequency).double().null())
                    .col(ColumnDef::new(D2::Kw).double().null())
                    .col(ColumnDef::new(D2::Kva).double().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_d2_meter_ts")
                    .table(D2::Table)
                    .col(D2::MeterSerial)
                    .col(D2::Ts)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(D3B3::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(D3B3::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(D3B3::MeterSerial).text().not_null())
                    .col(ColumnDef::new(D3B3::Ts).text().not_null())
                    .col(ColumnDef::new(D3B3::Kwh).double().null())
                    .col(ColumnDef::new(D3B3::Kvah).double().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_d3_b3_meter_ts")
                    .table(D3B3::Table)
                    .col(D3B3::MeterSerial)
                    .col(D3B3::Ts)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(D3B3::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(D2::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum D2 {
    #[sea_orm(iden = "d2")]
    Table,
    Id,
    MeterSerial,
    Ts,
    VoltageR,
    VoltageY,
    VoltageB,
    CurrentR,
    CurrentY,
    CurrentB,
    NeutralCurrent,
    PowerFactor,
    Frequency,
    Kw,
    Kva,
}

#[derive(DeriveIden)]
enum D3B3 {
    #[sea_orm(iden = "d3_b3")]
    Table,
    Id,
    MeterSerial,
    Ts,
    Kwh,
    Kvah,
}
