//! Client error log entity
//!
//! Deduplicated by `(level, source, message)`: re-reporting touches
//! `last_seen` and bumps `occurrences` instead of inserting a new row.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, ToSchema)]
#[schema(as = LogEntry)]
#[sea_orm(table_name = "logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub level: String,
    pub source: String,
    pub message: String,
    pub stack: Option<String>,
    pub user_agent: Option<String>,
    pub first_seen: String,
    pub last_seen: String,
    pub occurrences: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
