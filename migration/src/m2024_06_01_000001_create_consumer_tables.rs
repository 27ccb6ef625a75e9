//! Migration to create the consumer-facing tables.
//!
//! Creates the consumer profile, tariff reference, billing, and location
//! hierarchy tables. These tables are populated by external provisioning and
//! billing systems; this service is one reader/writer among several.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ConsumersLkea::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ConsumersLkea::Uid)
                            .text()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ConsumersLkea::ConsumerName).text().not_null())
                    .col(ColumnDef::new(ConsumersLkea::MeterSerial).text().not_null())
                    .col(ColumnDef::new(ConsumersLkea::BlockName).text().null())
                    .col(ColumnDef::new(ConsumersLkea::Address).text().null())
                    .col(ColumnDef::new(ConsumersLkea::Phone).text().null())
                    .col(ColumnDef::new(ConsumersLkea::ConnectionType).text().null())
                    .col(ColumnDef::new(ConsumersLkea::FeederId).integer().null())
                    .col(ColumnDef::new(ConsumersLkea::ProfileImage).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TariffLkea::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TariffLkea::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TariffLkea::ConsumerCategory).text().not_null())
                    .col(ColumnDef::new(TariffLkea::SlabStartKwh).double().not_null())
                    .col(ColumnDef::new(TariffLkea::SlabEndKwh).double().null())
                    .col(ColumnDef::new(TariffLkea::RatePerKwh).double().not_null())
                    .col(ColumnDef::new(TariffLkea::FixedCharge).double().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BillLkea::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BillLkea::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BillLkea::Uid).text().not_null())
                    .col(ColumnDef::new(BillLkea::BillDate).text().not_null())
                    .col(ColumnDef::new(BillLkea::BillAmount).double().not_null())
                    .col(ColumnDef::new(BillLkea::DueAmount).double().not_null())
                    .col(ColumnDef::new(BillLkea::DueDate).text().null())
                    .col(ColumnDef::new(BillLkea::Status).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bill_lkea_uid")
                    .table(BillLkea::Table)
                    .col(BillLkea::Uid)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LocationHierarchyLkea::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LocationHierarchyLkea::LocationId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LocationHierarchyLkea::LocationName)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LocationHierarchyLkea::LocationType)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LocationHierarchyLkea::ParentLocationId)
                            .integer()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_location_hierarchy_name")
                    .table(LocationHierarchyLkea::Table)
                    .col(LocationHierarchyLkea::LocationName)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LocationHierarchyLkea::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BillLkea::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TariffLkea::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ConsumersLkea::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ConsumersLkea {
    #[sea_orm(iden = "consumers_lkea")]
    Table,
    Uid,
    ConsumerName,
    MeterSerial,
    BlockName,
    Address,
    Phone,
    ConnectionType,
    FeederId,
    ProfileImage,
}

#[derive(DeriveIden)]
enum TariffLkea {
    #[sea_orm(iden = "tariff_lkea")]
    Table,
    Id,
    ConsumerCategory,
    SlabStartKwh,
    SlabEndKwh,
    RatePerKwh,
    FixedCharge,
}

#[derive(DeriveIden)]
enum BillLkea {
    #[sea_orm(iden = "bill_lkea")]
    Table,
    Id,
    Uid,
    BillDate,
    BillAmount,
    DueAmount,
    DueDate,
    Status,
}

#[derive(DeriveIden)]
enum LocationHierarchyLkea {
    #[sea_orm(iden = "location_hierarchy_lkea")]
    Table,
    LocationId,
    LocationName,
    LocationType,
    ParentLocationId,
}
