//! Consumer profile entity
//!
//! Rows in `consumers_lkea` are created by the external provisioning process;
//! this service reads them and only writes the profile image path.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

/// Consumer profile joined against telemetry and billing by `uid`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, ToSchema)]
#[schema(as = Consumer)]
#[sea_orm(table_name = "consumers_lkea")]
pub struct Model {
    /// Unique consumer identifier, the primary join key across tables
    #[sea_orm(primary_key, auto_increment = false)]
    pub uid: String,

    pub consumer_name: String,

    /// Serial of the meter currently installed for this consumer
    pub meter_serial: String,

    pub block_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub connection_type: Option<String>,

    /// Feeder this consumer's meter hangs off (DTR → Feeder → Meter)
    pub feeder_id: Option<i32>,

    /// Path produced by the external file-storage collaborator
    pub profile_image: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
