//! Support ticket entity
//!
//! `ticket_id` is caller-supplied and unique. `status` is a free-form string;
//! there is no enumerated transition set. `last_updated` is kept
//! in the fixed `YYYY-MM-DD HH:MM:SS` form and refreshed on every mutation.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = Ticket)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub ticket_id: String,

    pub subject: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub region: Option<String>,
    pub district: Option<String>,
    pub status: String,
    pub priority: Option<String>,
    pub consumer_uid: Option<String>,
    pub consumer_name: Option<String>,
    pub last_updated: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
