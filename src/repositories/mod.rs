//! # Repository Layer
//!
//! Domain query modules grouped by subject: Consumer, DTR/Feeder, Tickets,
//! Logs. Every method is a pure function of the persistence gateway and its
//! typed parameters: no retry, no caching, no cross-call state. Single-row
//! lookups declare their zero-row case explicitly instead of unwrapping.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use sea_orm::DbBackend;

pub mod consumer;
pub mod dtr;
pub mod log;
pub mod ticket;

pub use consumer::ConsumerRepository;
pub use dtr::{DtrRepository, TelemetryMetric};
pub use log::LogRepository;
pub use ticket::TicketRepository;

/// Timestamp format shared with the external loaders that populate the
/// telemetry and billing tables. Lexicographic order equals chronological
/// order, so window bounds can be bound as plain strings.
pub(crate) const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Render the `n`-th positional placeholder for the active backend
/// (`$n` on Postgres, `?` elsewhere).
pub(crate) fn ph(backend: DbBackend, n: usize) -> String {
    match backend {
        DbBackend::Postgres => format!("${n}"),
        _ => "?".to_string(),
    }
}

/// Render a comma-separated placeholder list starting at position `start`.
pub(crate) fn ph_list(backend: DbBackend, start: usize, count: usize) -> String {
    (start..start + count)
        .map(|n| ph(backend, n))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn now_timestamp() -> String {
    Utc::now().format(TS_FORMAT).to_string()
}

/// Start of the trailing window `hours` back from now.
pub(crate) fn window_start_hours(hours: u32) -> String {
    (Utc::now() - Duration::hours(i64::from(hours)))
        .format(TS_FORMAT)
        .to_string()
}

/// Start of the trailing window `days` back from now, truncated to midnight
/// so a whole calendar day is never split.
pub(crate) fn window_start_days(days: u32) -> String {
    (Utc::now() - Duration::days(i64::from(days)))
        .date_naive()
        .format(DATE_FORMAT)
        .to_string()
}

/// `[start, end)` date bounds of the current calendar month, formatted
/// `YYYY-MM-DD`. Used by the two-tier latest-bill ordering.
pub(crate) fn current_month_bounds() -> (String, String) {
    let today = Utc::now().date_naive();
    let month_start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
        .unwrap_or(today);
    let next_month_start = if today.month() == 12 {
        NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
    }
    .unwrap_or(month_start);

    (
        month_start.format(DATE_FORMAT).to_string(),
        next_month_start.format(DATE_FORMAT).to_string(),
    )
}
