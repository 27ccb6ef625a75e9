//! Bill entity
//!
//! One row per consumer per billing period, written by the external billing
//! job. "Latest bill" follows a two-tier ordering: a bill in the current
//! calendar month wins over any other, then most recent `bill_date`.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "bill_lkea")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub uid: String,

    /// Billing period date, formatted `YYYY-MM-DD`
    pub bill_date: String,

    pub bill_amount: f64,
    pub due_amount: f64,

    pub due_date: Option<String>,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
