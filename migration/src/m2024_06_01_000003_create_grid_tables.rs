//! Migration to create the distribution-grid topology and consumption tables.
//!
//! DTR → Feeder → Meter is a one-to-many hierarchy; consumers reference a
//! feeder, feeders reference a DTR. `consumption_lkea` carries per-meter
//! consumption rows, `disconnected_consumers_lkea` is the exclusion set used
//! by the daily aggregation.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DtrMaster::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DtrMaster::DtrId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DtrMaster::DtrName).text().not_null())
                    .col(ColumnDef::new(DtrMaster::CapacityKva).double().null())
                    .col(ColumnDef::new(DtrMaster::LocationId).integer().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FeederMaster::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeederMaster::FeederId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FeederMaster::DtrId).integer().not_null())
                    .col(ColumnDef::new(FeederMaster::FeederName).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_feeder_master_dtr")
                    .table(FeederMaster::Table)
                    .col(FeederMaster::DtrId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ConsumptionLkea::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ConsumptionLkea::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ConsumptionLkea::Uid).text().not_null())
                    .col(ColumnDef::new(ConsumptionLkea::MeterSerial).text().not_null())
                    .col(ColumnDef::new(ConsumptionLkea::Ts).text().not_null())
                    .col(ColumnDef::new(ConsumptionLkea::Kwh).double().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_consumption_meter_ts")
                    .table(ConsumptionLkea::Table)
                    .col(ConsumptionLkea::MeterSerial)
                    .col(ConsumptionLkea::Ts)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DisconnectedConsumersLkea::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DisconnectedConsumersLkea::Uid)
                            .text()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DisconnectedConsumersLkea::DisconnectedOn)
                            .text()
                            .null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(DisconnectedConsumersLkea::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(ConsumptionLkea::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeederMaster::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DtrMaster::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DtrMaster {
    #[sea_orm(iden = "dtr_master")]
    Table,
    DtrId,
    DtrName,
    CapacityKva,
    LocationId,
}

#[derive(DeriveIden)]
enum FeederMaster {
    #[sea_orm(iden = "feeder_master")]
    Table,
    FeederId,
    DtrId,
    FeederName,
}

#[derive(DeriveIden)]
enum ConsumptionLkea {
    #[sea_orm(iden = "consumption_lkea")]
    Table,
    Id,
    Uid,
    MeterSerial,
    Ts,
    Kwh,
}

#[derive(DeriveIden)]
enum DisconnectedConsumersLkea {
    #[sea_orm(iden = "disconnected_consumers_lkea")]
    Table,
    Uid,
    DisconnectedOn,
}
