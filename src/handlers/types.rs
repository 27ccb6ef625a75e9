//! # Shared Response Types
//!
//! Envelope and pagination metadata shared across the API handlers.

use serde::Serialize;
use utoipa::ToSchema;

/// Standard success envelope: `{status: "success", data}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Envelope<T> {
    /// Envelope discriminator; always `"success"` for this type
    pub status: &'static str,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}

/// Envelope without a data payload: `{status: "success"}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusOnly {
    pub status: &'static str,
}

impl StatusOnly {
    pub fn success() -> Self {
        Self { status: "success" }
    }
}

/// Success envelope carrying a human-readable message.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusMessage {
    pub status: &'static str,
    pub message: String,
}

impl StatusMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
        }
    }
}

/// Bare message body, used by ticket deletion.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Paginated success envelope: `{status, data, meta}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PagedEnvelope<T> {
    pub status: &'static str,
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> PagedEnvelope<T> {
    pub fn success(data: Vec<T>, meta: PageMeta) -> Self {
        Self {
            status: "success",
            data,
            meta,
        }
    }
}

/// Page metadata derived entirely from `(page, limit, total_count)`.
///
/// Invariants: `total_pages == ceil(total_count / limit)`,
/// `has_next_page == current_page < total_pages`,
/// `has_prev_page == current_page > 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageMeta {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_count: u64,
    pub limit: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PageMeta {
    pub fn new(current_page: u64, limit: u64, total_count: u64) -> Self {
        let limit = limit.max(1);
        let current_page = current_page.max(1);
        let total_pages = total_count.div_ceil(limit);

        Self {
            current_page,
            total_pages,
            total_count,
            limit,
            has_next_page: current_page < total_pages,
            has_prev_page: current_page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_is_ceiling_division() {
        assert_eq!(PageMeta::new(1, 10, 0).total_pages, 0);
        assert_eq!(PageMeta::new(1, 10, 1).total_pages, 1);
        assert_eq!(PageMeta::new(1, 10, 10).total_pages, 1);
        assert_eq!(PageMeta::new(1, 10, 11).total_pages, 2);
        assert_eq!(PageMeta::new(1, 3, 100).total_pages, 34);
    }

    #[test]
    fn next_and_prev_flags_are_consistent() {
        for total in [0u64, 1, 9, 10, 11, 95] {
            for page in 1..=12u64 {
                let meta = PageMeta::new(page, 10, total);
                assert_eq!(meta.has_next_page, page < meta.total_pages);
                assert_eq!(meta.has_prev_page, page > 1);
            }
        }
    }

    #[test]
    fn middle_page_has_both_neighbours() {
        let meta = PageMeta::new(2, 10, 30);
        assert!(meta.has_next_page);
        assert!(meta.has_prev_page);
    }

    #[test]
    fn envelope_serializes_status_and_data() {
        let body = serde_json::to_value(Envelope::success(vec![1, 2, 3])).unwrap();
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn status_only_has_no_data_field() {
        let body = serde_json::to_value(StatusOnly::success()).unwrap();
        assert_eq!(body["status"], "success");
        assert!(body.get("data").is_none());
    }
}
