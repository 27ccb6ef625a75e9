//! # Server Configuration
//!
//! Route table, shared application state, and server startup for the
//! gridportal API.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::Request,
    http::HeaderValue,
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::db::Db;
use crate::handlers;
use crate::telemetry::{self, TraceContext};

pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: Arc<AppConfig>,
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/consumer/details", get(handlers::consumer::consumer_details))
        .route("/consumer/tariff", get(handlers::consumer::consumer_tariff))
        .route("/consumer/power", get(handlers::consumer::consumer_power))
        .route("/consumer/billing", get(handlers::consumer::consumer_billing))
        .route("/dtr/table", get(handlers::dtr::dtr_table))
        .route("/dtr/{dtr_id}/load", get(handlers::dtr::dtr_load))
        .route(
            "/dtr/{dtr_id}/consumption/daily",
            get(handlers::dtr::dtr_daily_consumption),
        )
        .route(
            "/tickets",
            get(handlers::tickets::list_tickets).post(handlers::tickets::create_ticket),
        )
        .route(
            "/tickets/{ticket_id}",
            get(handlers::tickets::get_ticket)
                .patch(handlers::tickets::update_ticket_status)
                .delete(handlers::tickets::delete_ticket),
        )
        .route(
            "/profile/edit/image",
            axum::routing::post(handlers::profile::edit_profile_image),
        )
        .route(
            "/log/error",
            axum::routing::post(handlers::logs::record_error),
        )
        .route("/log/logs", get(handlers::logs::list_logs))
        .layer(middleware::from_fn(trace_scope))
        .layer(TraceLayer::new_for_http())
        // Browser dashboard calls the API cross-origin
        .layer(CorsLayer::permissive())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
}

/// Run the request inside a trace-context scope so every log line and error
/// response produced below it carries the same correlation id. An inbound
/// `x-trace-id` from the gateway is honored; otherwise one is generated.
async fn trace_scope(request: Request, next: Next) -> Response {
    let trace_id = request
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let context = TraceContext {
        trace_id: trace_id.clone(),
    };
    let mut response = telemetry::with_trace_context(context, next.run(request)).await;

    if let Ok(value) = HeaderValue::from_str(&trace_id) {
        response.headers_mut().insert(TRACE_ID_HEADER, value);
    }

    response
}

/// Starts the server with the given configuration
pub async fn run_server(config: AppConfig, db: Db) -> Result<()> {
    let addr = config.bind_addr().context("invalid server address")?;
    let profile = config.profile.clone();

    let state = AppState {
        db,
        config: Arc::new(config),
    };
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, %profile, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::health,
        crate::handlers::consumer::consumer_details,
        crate::handlers::consumer::consumer_tariff,
        crate::handlers::consumer::consumer_power,
        crate::handlers::consumer::consumer_billing,
        crate::handlers::dtr::dtr_table,
        crate::handlers::dtr::dtr_load,
        crate::handlers::dtr::dtr_daily_consumption,
        crate::handlers::tickets::list_tickets,
        crate::handlers::tickets::get_ticket,
        crate::handlers::tickets::create_ticket,
        crate::handlers::tickets::update_ticket_status,
        crate::handlers::tickets::delete_ticket,
        crate::handlers::profile::edit_profile_image,
        crate::handlers::logs::record_error,
        crate::handlers::logs::list_logs,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::models::consumer::Model,
            crate::models::tariff::Model,
            crate::models::power_telemetry::Model,
            crate::models::ticket::Model,
            crate::models::log_entry::Model,
            crate::error::ApiError,
            crate::handlers::types::StatusOnly,
            crate::handlers::types::StatusMessage,
            crate::handlers::types::MessageResponse,
            crate::handlers::types::PageMeta,
            crate::handlers::consumer::ConsumerDetailsData,
            crate::handlers::consumer::ConsumerPowerData,
            crate::handlers::dtr::DtrLoadData,
            crate::handlers::tickets::CreateTicketDto,
            crate::handlers::tickets::UpdateTicketStatusDto,
            crate::handlers::profile::EditProfileImageDto,
            crate::handlers::logs::RecordLogDto,
            crate::handlers::logs::RecordLogResponse,
            crate::handlers::logs::ListLogsResponse,
            crate::repositories::consumer::LocationChain,
            crate::repositories::dtr::DtrTableRow,
            crate::repositories::dtr::DailyConsumption,
        )
    ),
    info(
        title = "Gridportal API",
        description = "Backend API for the electricity consumer dashboard",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
