//! # Ticket Handlers
//!
//! Support-ticket CRUD. Unlike the enveloped consumer routes, tickets are
//! returned as bare JSON records; the dashboard's ticket widget consumes
//! them directly.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{ApiError, validation_error};
use crate::handlers::types::MessageResponse;
use crate::models::ticket::Model as TicketModel;
use crate::repositories::TicketRepository;
use crate::repositories::ticket::CreateTicketRequest;
use crate::server::AppState;

/// Request payload for creating a ticket.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTicketDto {
    /// Caller-supplied unique ticket identifier
    #[schema(example = "TKT-2026-0042")]
    pub ticket_id: String,
    #[schema(example = "Power outage in Block A")]
    pub subject: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub region: Option<String>,
    pub district: Option<String>,
    /// Free-form status string; no enumerated transition set
    #[schema(example = "open")]
    pub status: String,
    pub priority: Option<String>,
    pub consumer_uid: Option<String>,
    pub consumer_name: Option<String>,
}

/// Request payload for a status update.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTicketStatusDto {
    #[schema(example = "resolved")]
    pub status: String,
}

/// List all tickets
#[utoipa::path(
    get,
    path = "/tickets",
    responses(
        (status = 200, description = "All tickets", body = Vec<TicketModel>),
        (status = 504, description = "Query timed out", body = ApiError)
    ),
    tag = "tickets"
)]
pub async fn list_tickets(
    State(state): State<AppState>,
) -> Result<Json<Vec<TicketModel>>, ApiError> {
    let repo = TicketRepository::new(&state.db);
    let tickets = repo.list_tickets().await?;

    Ok(Json(tickets))
}

/// Fetch one ticket
#[utoipa::path(
    get,
    path = "/tickets/{ticket_id}",
    params(("ticket_id" = String, Path, description = "Ticket identifier")),
    responses(
        (status = 200, description = "The ticket", body = TicketModel),
        (status = 404, description = "Ticket not found", body = ApiError)
    ),
    tag = "tickets"
)]
pub async fn get_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<String>,
) -> Result<Json<TicketModel>, ApiError> {
    let repo = TicketRepository::new(&state.db);
    let ticket = repo.get_ticket(&ticket_id).await?;

    Ok(Json(ticket))
}

/// Create a ticket
#[utoipa::path(
    post,
    path = "/tickets",
    request_body = CreateTicketDto,
    responses(
        (status = 201, description = "Ticket created", body = TicketModel),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 409, description = "Ticket id already exists", body = ApiError)
    ),
    tag = "tickets"
)]
pub async fn create_ticket(
    State(state): State<AppState>,
    Json(request): Json<CreateTicketDto>,
) -> Result<(StatusCode, Json<TicketModel>), ApiError> {
    for (field, value) in [
        ("ticket_id", &request.ticket_id),
        ("subject", &request.subject),
        ("status", &request.status),
    ] {
        if value.trim().is_empty() {
            return Err(validation_error(
                "Ticket payload is incomplete",
                serde_json::json!({
                    "field": field,
                    "message": format!("{field} is required and cannot be blank"),
                }),
            ));
        }
    }

    let repo = TicketRepository::new(&state.db);
    let ticket = repo
        .create_ticket(CreateTicketRequest {
            ticket_id: request.ticket_id.trim().to_string(),
            subject: request.subject,
            category: request.category,
            description: request.description,
            region: request.region,
            district: request.district,
            status: request.status,
            priority: request.priority,
            consumer_uid: request.consumer_uid,
            consumer_name: request.consumer_name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ticket)))
}

/// Update a ticket's status
#[utoipa::path(
    patch,
    path = "/tickets/{ticket_id}",
    params(("ticket_id" = String, Path, description = "Ticket identifier")),
    request_body = UpdateTicketStatusDto,
    responses(
        (status = 200, description = "Ticket after the update", body = TicketModel),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Ticket not found", body = ApiError)
    ),
    tag = "tickets"
)]
pub async fn update_ticket_status(
    State(state): State<AppState>,
    Path(ticket_id): Path<String>,
    Json(request): Json<UpdateTicketStatusDto>,
) -> Result<Json<TicketModel>, ApiError> {
    if request.status.trim().is_empty() {
        return Err(validation_error(
            "Ticket status cannot be blank",
            serde_json::json!({"field": "status"}),
        ));
    }

    let repo = TicketRepository::new(&state.db);
    let ticket = repo.update_status(&ticket_id, request.status).await?;

    Ok(Json(ticket))
}

/// Delete a ticket
#[utoipa::path(
    delete,
    path = "/tickets/{ticket_id}",
    params(("ticket_id" = String, Path, description = "Ticket identifier")),
    responses(
        (status = 200, description = "Ticket deleted", body = MessageResponse),
        (status = 404, description = "Ticket not found", body = ApiError)
    ),
    tag = "tickets"
)]
pub async fn delete_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let repo = TicketRepository::new(&state.db);
    repo.delete_ticket(&ticket_id).await?;

    Ok(Json(MessageResponse {
        message: format!("ticket {ticket_id} deleted"),
    }))
}
