//! Instantaneous power-quality telemetry entity (`d2`)
//!
//! Written by the external meter loaders; timestamps are formatted
//! `YYYY-MM-DD HH:MM:SS`, so lexicographic order is chronological order.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, ToSchema)]
#[schema(as = PowerSnapshot)]
#[sea_orm(table_name = "d2")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub meter_serial: String,
    pub ts: String,

    pub voltage_r: Option<f64>,
    pub voltage_y: Option<f64>,
    pub voltage_b: Option<f64>,
    pub current_r: Option<f64>,
    pub current_y: Option<f64>,
    pub current_b: Option<f64>,
    pub neutral_current: Option<f64>,
    pub power_factor: Option<f64>,
    pub frequency: Option<f64>,
    pub kw: Option<f64>,
    pub kva: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
