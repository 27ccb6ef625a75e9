//! Database migrations for the gridportal API.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2024_06_01_000001_create_consumer_tables;
mod m2024_06_01_000002_create_telemetry_tables;
mod m2024_06_01_000003_create_grid_tables;
mod m2024_06_10_000004_create_tickets;
mod m2024_06_10_000005_create_logs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2024_06_01_000001_create_consumer_tables::Migration),
            Box::new(m2024_06_01_000002_create_telemetry_tables::Migration),
            Box::new(m2024_06_01_000003_create_grid_tables::Migration),
            Box::new(m2024_06_10_000004_create_tickets::Migration),
            Box::new(m2024_06_10_000005_create_logs::Migration),
        ]
    }
}
