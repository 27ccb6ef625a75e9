//! # Data Models
//!
//! SeaORM entities for the tables this service reads and writes. The schemas
//! mirror what the external provisioning, metering, and billing systems
//! populate; this service is not their exclusive owner.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod bill;
pub mod consumer;
pub mod consumption;
pub mod disconnected_consumer;
pub mod dtr;
pub mod energy_telemetry;
pub mod feeder;
pub mod location;
pub mod log_entry;
pub mod power_telemetry;
pub mod tariff;
pub mod ticket;

pub use bill::Entity as Bill;
pub use consumer::Entity as Consumer;
pub use consumption::Entity as Consumption;
pub use disconnected_consumer::Entity as DisconnectedConsumer;
pub use dtr::Entity as Dtr;
pub use energy_telemetry::Entity as EnergyTelemetry;
pub use feeder::Entity as Feeder;
pub use location::Entity as Location;
pub use log_entry::Entity as LogEntry;
pub use power_telemetry::Entity as PowerTelemetry;
pub use tariff::Entity as Tariff;
pub use ticket::Entity as Ticket;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "gridportal".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
