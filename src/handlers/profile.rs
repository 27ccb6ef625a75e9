//! # Profile Handlers
//!
//! The profile image itself is handled by the external file-storage
//! collaborator; this endpoint only records the resulting path against the
//! acting consumer.

use axum::{extract::State, response::Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::auth::ConsumerUid;
use crate::error::{ApiError, validation_error};
use crate::handlers::types::StatusMessage;
use crate::repositories::ConsumerRepository;
use crate::server::AppState;

/// Request payload carrying the stored image path.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EditProfileImageDto {
    /// Path produced by the file-storage collaborator
    #[schema(example = "uploads/profiles/c-1001.png")]
    pub image_path: String,
}

/// Record a new profile image path for the acting consumer
#[utoipa::path(
    post,
    path = "/profile/edit/image",
    request_body = EditProfileImageDto,
    responses(
        (status = 200, description = "Image path stored", body = StatusMessage),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing consumer identity", body = ApiError),
        (status = 404, description = "Consumer not found", body = ApiError)
    ),
    tag = "profile"
)]
pub async fn edit_profile_image(
    State(state): State<AppState>,
    uid: ConsumerUid,
    Json(request): Json<EditProfileImageDto>,
) -> Result<Json<StatusMessage>, ApiError> {
    let image_path = request.image_path.trim();
    if image_path.is_empty() {
        return Err(validation_error(
            "Image path cannot be blank",
            serde_json::json!({"field": "image_path"}),
        ));
    }

    let repo = ConsumerRepository::new(&state.db);
    repo.set_profile_image(uid.as_str(), image_path.to_string())
        .await?;

    Ok(Json(StatusMessage::success("profile image updated")))
}
