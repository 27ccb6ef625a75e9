//! # Consumer Dashboard Handlers
//!
//! Read endpoints behind the consumer dashboard. The acting consumer is
//! identified by the `x-consumer-uid` header (see [`crate::auth`]); each
//! handler composes one to three repository calls into a
//! `{status, data}` envelope.

use axum::{extract::State, response::Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::ConsumerUid;
use crate::error::ApiError;
use crate::handlers::types::{Envelope, StatusOnly};
use crate::models::consumer::Model as ConsumerModel;
use crate::models::power_telemetry::Model as PowerModel;
use crate::models::tariff::Model as TariffModel;
use crate::repositories::ConsumerRepository;
use crate::repositories::consumer::LocationChain;
use crate::server::AppState;

/// Consumer profile merged with the location walk and the meter's last
/// communication time.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConsumerDetailsData {
    #[serde(flatten)]
    pub consumer: ConsumerModel,
    /// Location hierarchy resolved from the consumer's block name; absent
    /// when the block is unknown to the hierarchy table
    #[serde(flatten)]
    pub hierarchy: Option<LocationChain>,
    pub last_comm: Option<String>,
}

/// Latest power-quality snapshot plus billing due amount.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConsumerPowerData {
    /// Newest telemetry row for the consumer's meter; absent when the meter
    /// has never reported
    #[serde(flatten)]
    pub power: Option<PowerModel>,
    pub last_comm: Option<String>,
    /// Total outstanding amount across all bills; zero when there are none
    pub due: f64,
}

/// Consumer profile, hierarchy, and last communication time
#[utoipa::path(
    get,
    path = "/consumer/details",
    responses(
        (status = 200, description = "Consumer details", body = Envelope<ConsumerDetailsData>),
        (status = 401, description = "Missing consumer identity", body = ApiError),
        (status = 404, description = "Consumer not found", body = ApiError),
        (status = 504, description = "Query timed out", body = ApiError)
    ),
    tag = "consumer"
)]
pub async fn consumer_details(
    State(state): State<AppState>,
    uid: ConsumerUid,
) -> Result<Json<Envelope<ConsumerDetailsData>>, ApiError> {
    let repo = ConsumerRepository::new(&state.db);

    let consumer = repo.get_consumer(uid.as_str()).await?;
    let hierarchy = match consumer.block_name.as_deref() {
        Some(block) => repo.location_hierarchy(block).await?,
        None => None,
    };
    let last_comm = repo.last_communication(&consumer.meter_serial).await?;

    Ok(Json(Envelope::success(ConsumerDetailsData {
        consumer,
        hierarchy,
        last_comm,
    })))
}

/// Full tariff rate table
#[utoipa::path(
    get,
    path = "/consumer/tariff",
    responses(
        (status = 200, description = "All tariff rates", body = Envelope<Vec<TariffModel>>),
        (status = 401, description = "Missing consumer identity", body = ApiError),
        (status = 504, description = "Query timed out", body = ApiError)
    ),
    tag = "consumer"
)]
pub async fn consumer_tariff(
    State(state): State<AppState>,
    _uid: ConsumerUid,
) -> Result<Json<Envelope<Vec<TariffModel>>>, ApiError> {
    let repo = ConsumerRepository::new(&state.db);
    let rates = repo.tariff_rates().await?;

    Ok(Json(Envelope::success(rates)))
}

/// Live power-quality snapshot with last communication and due amount
#[utoipa::path(
    get,
    path = "/consumer/power",
    responses(
        (status = 200, description = "Power snapshot", body = Envelope<ConsumerPowerData>),
        (status = 401, description = "Missing consumer identity", body = ApiError),
        (status = 404, description = "Consumer not found", body = ApiError),
        (status = 504, description = "Query timed out", body = ApiError)
    ),
    tag = "consumer"
)]
pub async fn consumer_power(
    State(state): State<AppState>,
    uid: ConsumerUid,
) -> Result<Json<Envelope<ConsumerPowerData>>, ApiError> {
    let repo = ConsumerRepository::new(&state.db);

    let consumer = repo.get_consumer(uid.as_str()).await?;
    let power = repo.power_snapshot(&consumer.meter_serial).await?;
    let due = repo.overdue_amount(uid.as_str()).await?;
    let last_comm = power.as_ref().map(|p| p.ts.clone());

    Ok(Json(Envelope::success(ConsumerPowerData {
        power,
        last_comm,
        due,
    })))
}

/// Billing check for the current consumer
///
/// The bill payload is intentionally not part of the response yet; the
/// dashboard contract for its shape is still unconfirmed, so the endpoint
/// only reports whether the lookup succeeded.
#[utoipa::path(
    get,
    path = "/consumer/billing",
    responses(
        (status = 200, description = "Billing lookup succeeded", body = StatusOnly),
        (status = 401, description = "Missing consumer identity", body = ApiError),
        (status = 404, description = "Consumer not found", body = ApiError),
        (status = 504, description = "Query timed out", body = ApiError)
    ),
    tag = "consumer"
)]
pub async fn consumer_billing(
    State(state): State<AppState>,
    uid: ConsumerUid,
) -> Result<Json<StatusOnly>, ApiError> {
    let repo = ConsumerRepository::new(&state.db);

    repo.get_consumer(uid.as_str()).await?;
    let _latest = repo.latest_bill(uid.as_str()).await?;

    Ok(Json(StatusOnly::success()))
}
