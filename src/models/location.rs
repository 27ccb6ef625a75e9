//! Location hierarchy entity
//!
//! Self-referential tree of up to 5 levels; each node optionally points at a
//! parent via `parent_location_id`.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "location_hierarchy_lkea")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub location_id: i32,

    pub location_name: String,

    /// Level label, e.g. "block", "substation", "division"
    pub location_type: String,

    pub parent_location_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
