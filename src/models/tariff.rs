//! Tariff rate entity
//!
//! Reference table read in full, never filtered or mutated by this service.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, ToSchema)]
#[schema(as = TariffRate)]
#[sea_orm(table_name = "tariff_lkea")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub consumer_category: String,

    /// Lower bound of the consumption slab, in kWh
    pub slab_start_kwh: f64,

    /// Upper bound of the slab; open-ended when absent
    pub slab_end_kwh: Option<f64>,

    pub rate_per_kwh: f64,
    pub fixed_charge: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
