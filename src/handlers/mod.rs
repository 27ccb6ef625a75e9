//! # API Handlers
//!
//! View assemblers for the gridportal API: each handler composes one or more
//! repository calls and shapes the result into the endpoint's JSON envelope.

use axum::{extract::State, response::Json};

use crate::db;
use crate::error::{ApiError, RepositoryError};
use crate::handlers::types::StatusOnly;
use crate::models::ServiceInfo;
use crate::server::AppState;

pub mod consumer;
pub mod dtr;
pub mod logs;
pub mod profile;
pub mod tickets;
pub mod types;

/// Root handler that returns basic service information
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service information", body = ServiceInfo)
    ),
    tag = "root"
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::default())
}

/// Liveness probe that also verifies the database pool
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and database are up", body = StatusOnly),
        (status = 503, description = "Database unreachable", body = ApiError)
    ),
    tag = "root"
)]
pub async fn health(State(state): State<AppState>) -> Result<Json<StatusOnly>, ApiError> {
    db::health_check(state.db.conn())
        .await
        .map_err(|err| RepositoryError::Unavailable(err.to_string()))?;

    Ok(Json(StatusOnly::success()))
}
