//! Meter consumption entity (`consumption_lkea`)

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "consumption_lkea")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub uid: String,
    pub meter_serial: String,
    pub ts: String,
    pub kwh: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
