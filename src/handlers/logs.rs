//! # Client Log Handlers
//!
//! Intake and review of error reports from the browser dashboard. These
//! routes keep the `{success, ...}` envelope the dashboard's error reporter
//! already speaks.

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::log_entry::Model as LogModel;
use crate::repositories::LogRepository;
use crate::repositories::log::NewLogEntry;
use crate::server::AppState;

/// A client-side error report.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordLogDto {
    #[schema(example = "error")]
    pub level: String,
    /// Dashboard module that observed the failure
    #[schema(example = "dashboard/billing")]
    pub source: String,
    #[schema(example = "TypeError: x is undefined")]
    pub message: String,
    pub stack: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecordLogResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListLogsResponse {
    pub success: bool,
    pub logs: Vec<LogModel>,
}

/// Record a client error report
///
/// Identical reports (same level, source, and message) collapse into one
/// row with an occurrence counter.
#[utoipa::path(
    post,
    path = "/log/error",
    request_body = RecordLogDto,
    responses(
        (status = 200, description = "Report stored", body = RecordLogResponse),
        (status = 400, description = "Validation failed", body = ApiError)
    ),
    tag = "logs"
)]
pub async fn record_error(
    State(state): State<AppState>,
    Json(request): Json<RecordLogDto>,
) -> Result<Json<RecordLogResponse>, ApiError> {
    let repo = LogRepository::new(&state.db);
    let stored = repo
        .record(NewLogEntry {
            level: request.level,
            source: request.source,
            message: request.message,
            stack: request.stack,
            user_agent: request.user_agent,
        })
        .await?;

    Ok(Json(RecordLogResponse {
        success: true,
        message: format!("log recorded ({} occurrences)", stored.occurrences),
    }))
}

/// List stored client error reports
#[utoipa::path(
    get,
    path = "/log/logs",
    responses(
        (status = 200, description = "All stored reports, newest first", body = ListLogsResponse)
    ),
    tag = "logs"
)]
pub async fn list_logs(
    State(state): State<AppState>,
) -> Result<Json<ListLogsResponse>, ApiError> {
    let repo = LogRepository::new(&state.db);
    let logs = repo.list().await?;

    Ok(Json(ListLogsResponse {
        success: true,
        logs,
    }))
}
