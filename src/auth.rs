//! # Actor Context
//!
//! Consumer identity is established by an external authentication gateway
//! that fronts this API and injects the `x-consumer-uid` header. This module
//! only extracts and validates that header; session handling lives upstream.
//! A missing or malformed header is rejected with 401 before any database
//! access.

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, unauthorized};

pub const CONSUMER_UID_HEADER: &str = "x-consumer-uid";

/// Consumer identifier extracted from the gateway-injected header.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConsumerUid(pub String);

impl ConsumerUid {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for ConsumerUid
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(CONSUMER_UID_HEADER)
            .ok_or_else(|| unauthorized(Some("Missing x-consumer-uid header")))?
            .to_str()
            .map_err(|_| unauthorized(Some("Invalid x-consumer-uid header")))?
            .trim();

        if value.is_empty() {
            return Err(unauthorized(Some("Empty x-consumer-uid header")));
        }

        Ok(ConsumerUid(value.to_string()))
    }
}
