//! # Ticket Repository
//!
//! The one fully writable aggregate in the service. Ticket ids are
//! caller-supplied; duplicates surface as `Conflict`. Status is free-form,
//! and every mutation refreshes `last_updated`.

use chrono::{Duration, NaiveDateTime};
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Order, QueryOrder, Set};

use crate::db::Db;
use crate::error::RepositoryError;
use crate::models::Ticket;
use crate::models::ticket::{ActiveModel as TicketActiveModel, Column, Model as TicketModel};
use crate::repositories::{TS_FORMAT, now_timestamp};

/// Caller-supplied fields of a new ticket.
#[derive(Debug, Clone)]
pub struct CreateTicketRequest {
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
}

/// Repository for support ticket CRUD.
pub struct TicketRepository<'a> {
    db: &'a Db,
}

impl<'a> TicketRepository<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// All tickets, oldest id first.
    pub async fn list_tickets(&self) -> Result<Vec<TicketModel>, RepositoryError> {
        self.db
            .timed(
                Ticket::find()
                    .order_by(Column::TicketId, Order::Asc)
                    .all(self.db.conn()),
            )
            .await
    }

    /// Fetch a ticket by id, or `NotFound`.
    pub async fn get_ticket(&self, ticket_id: &str) -> Result<TicketModel, RepositoryError> {
        self.db
            .timed(Ticket::find_by_id(ticket_id.to_owned()).one(self.db.conn()))
            .await?
            .ok_or_else(|| RepositoryError::not_found(format!("ticket {ticket_id}")))
    }

    /// Create a ticket. A duplicate id trips the primary-key constraint and
    /// is reported as `Conflict`.
    pub async fn create_ticket(
        &self,
        request: CreateTicketRequest,
    ) -> Result<TicketModel, RepositoryError> {
        let ticket_id = request.ticket_id.clone();
        let ticket = TicketActiveModel {
            ticket_id: Set(request.ticket_id),
            subject: Set(request.subject),
            category: Set(request.category),
            description: Set(request.description),
            region: Set(request.region),
            district: Set(request.district),
            status: Set(request.status),
            priority: Set(request.priority),
            consumer_uid: Set(request.consumer_uid),
            consumer_name: Set(request.consumer_name),
            last_updated: Set(now_timestamp()),
        };

        self.db
            .timed(ticket.insert(self.db.conn()))
            .await
            .map_err(|err| match err {
                RepositoryError::Conflict(_) => {
                    RepositoryError::Conflict(format!("ticket {ticket_id} already exists"))
                }
                other => other,
            })
    }

    /// Replace a ticket's status and refresh `last_updated`. Returns the
    /// ticket as stored after the write.
    pub async fn update_status(
        &self,
        ticket_id: &str,
        status: String,
    ) -> Result<TicketModel, RepositoryError> {
        let ticket = self.get_ticket(ticket_id).await?;
        let stamp = bump_timestamp(&ticket.last_updated);

        let mut active = ticket.into_active_model();
        active.status = Set(status);
        active.last_updated = Set(stamp);

        self.db.timed(active.update(self.db.conn())).await
    }

    /// Delete a ticket, or `NotFound` when no row matches.
    pub async fn delete_ticket(&self, ticket_id: &str) -> Result<(), RepositoryError> {
        let outcome = self
            .db
            .timed(Ticket::delete_by_id(ticket_id.to_owned()).exec(self.db.conn()))
            .await?;

        if outcome.rows_affected == 0 {
            return Err(RepositoryError::not_found(format!("ticket {ticket_id}")));
        }

        Ok(())
    }
}

/// `last_updated` has second resolution, so an update landing within the same
/// second as the previous stamp would not be observably newer. Force the new
/// stamp past the old one in that case.
fn bump_timestamp(previous: &str) -> String {
    let now = now_timestamp();
    if now.as_str() > previous {
        return now;
    }

    match NaiveDateTime::parse_from_str(previous, TS_FORMAT) {
        Ok(parsed) => (parsed + Duration::seconds(1)).format(TS_FORMAT).to_string(),
        Err(_) => now,
    }
}
