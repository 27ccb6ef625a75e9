//! Energy-register telemetry entity (`d3_b3`)

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "d3_b3")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub meter_serial: String,
    pub ts: String,

    /// Cumulative active energy register
    pub kwh: Option<f64>,
    /// Cumulative apparent energy register
    pub kvah: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
