//! Feeder entity
//!
//! Distribution line connecting a DTR to downstream consumer meters.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "feeder_master")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub feeder_id: i32,

    pub dtr_id: i32,
    pub feeder_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
