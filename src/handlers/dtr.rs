//! # DTR Handlers
//!
//! Operator-facing views over the distribution-transformer hierarchy: the
//! paginated overview table, instantaneous load aggregates, and the daily
//! consumption series.

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::handlers::types::{Envelope, PageMeta, PagedEnvelope};
use crate::repositories::dtr::{DEFAULT_PAGE_SIZE, DailyConsumption, DtrTableRow};
use crate::repositories::{DtrRepository, TelemetryMetric, window_start_days, window_start_hours};
use crate::server::AppState;

/// Query parameters of the DTR overview table.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DtrTableQuery {
    /// 1-based page number, defaults to 1
    pub page: Option<u64>,
    /// Page size, clamped to 1..=100, defaults to 10
    pub limit: Option<u64>,
    /// Optional substring filter on the DTR name; case handling follows
    /// the backend's `LIKE` collation
    pub search: Option<String>,
}

/// Latest-per-meter aggregates across a DTR's meter set.
#[derive(Debug, Serialize, ToSchema)]
pub struct DtrLoadData {
    pub dtr_id: i32,
    pub dtr_name: String,
    pub meter_count: usize,
    /// Sum of each meter's newest cumulative kWh register in the window
    pub kwh: f64,
    pub kvah: f64,
    pub kw: f64,
    pub kva: f64,
    pub neutral_current: f64,
}

/// Paginated DTR overview table
#[utoipa::path(
    get,
    path = "/dtr/table",
    params(DtrTableQuery),
    responses(
        (status = 200, description = "One page of DTRs", body = PagedEnvelope<DtrTableRow>),
        (status = 504, description = "Query timed out", body = ApiError)
    ),
    tag = "dtr"
)]
pub async fn dtr_table(
    State(state): State<AppState>,
    Query(query): Query<DtrTableQuery>,
) -> Result<Json<PagedEnvelope<DtrTableRow>>, ApiError> {
    let repo = DtrRepository::new(&state.db);
    let page = repo
        .dtr_table(
            query.page.unwrap_or(1),
            query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
            query.search.as_deref(),
        )
        .await?;

    let meta = PageMeta::new(page.page, page.limit, page.total_count);
    Ok(Json(PagedEnvelope::success(page.rows, meta)))
}

/// Current load aggregates for one DTR
///
/// Each figure sums the single newest reading per meter inside the trailing
/// telemetry window; meters silent for the whole window contribute nothing.
#[utoipa::path(
    get,
    path = "/dtr/{dtr_id}/load",
    params(("dtr_id" = i32, Path, description = "DTR identifier")),
    responses(
        (status = 200, description = "Load aggregates", body = Envelope<DtrLoadData>),
        (status = 404, description = "DTR not found", body = ApiError),
        (status = 504, description = "Query timed out", body = ApiError)
    ),
    tag = "dtr"
)]
pub async fn dtr_load(
    State(state): State<AppState>,
    Path(dtr_id): Path<i32>,
) -> Result<Json<Envelope<DtrLoadData>>, ApiError> {
    let repo = DtrRepository::new(&state.db);

    let dtr = repo.get_dtr(dtr_id).await?;
    let meters = repo.meters_for_dtr(dtr_id).await?;
    let window_start = window_start_hours(state.config.telemetry_window_hours);

    let kwh = repo
        .latest_reading_total(TelemetryMetric::EnergyKwh, &meters, &window_start)
        .await?;
    let kvah = repo
        .latest_reading_total(TelemetryMetric::EnergyKvah, &meters, &window_start)
        .await?;
    let kw = repo
        .latest_reading_total(TelemetryMetric::ActivePowerKw, &meters, &window_start)
        .await?;
    let kva = repo
        .latest_reading_total(TelemetryMetric::ApparentPowerKva, &meters, &window_start)
        .await?;
    let neutral_current = repo
        .latest_reading_total(TelemetryMetric::NeutralCurrent, &meters, &window_start)
        .await?;

    Ok(Json(Envelope::success(DtrLoadData {
        dtr_id: dtr.dtr_id,
        dtr_name: dtr.dtr_name,
        meter_count: meters.len(),
        kwh,
        kvah,
        kw,
        kva,
        neutral_current,
    })))
}

/// Daily consumption series for one DTR
#[utoipa::path(
    get,
    path = "/dtr/{dtr_id}/consumption/daily",
    params(("dtr_id" = i32, Path, description = "DTR identifier")),
    responses(
        (status = 200, description = "Per-day kWh sums, ascending", body = Envelope<Vec<DailyConsumption>>),
        (status = 404, description = "DTR not found", body = ApiError),
        (status = 504, description = "Query timed out", body = ApiError)
    ),
    tag = "dtr"
)]
pub async fn dtr_daily_consumption(
    State(state): State<AppState>,
    Path(dtr_id): Path<i32>,
) -> Result<Json<Envelope<Vec<DailyConsumption>>>, ApiError> {
    let repo = DtrRepository::new(&state.db);

    repo.get_dtr(dtr_id).await?;
    let meters = repo.meters_for_dtr(dtr_id).await?;
    let window_start = window_start_days(state.config.consumption_window_days);
    let series = repo.daily_consumption(&meters, &window_start).await?;

    Ok(Json(Envelope::success(series)))
}
