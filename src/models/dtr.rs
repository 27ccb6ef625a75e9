//! Distribution transformer (DTR) entity

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "dtr_master")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub dtr_id: i32,

    pub dtr_name: String,
    pub capacity_kva: Option<f64>,
    pub location_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
