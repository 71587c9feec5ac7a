//! Member routes.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::member::{CreateMemberRequest, ListMembersResponse};
use domain::models::Member;
use shared::validation::{normalize_email, normalize_name};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

/// List all members.
///
/// GET /api/users
pub async fn list_members(
    State(state): State<AppState>,
) -> Result<Json<ListMembersResponse>, ApiError> {
    let data = state.members.list().await?;
    Ok(Json(ListMembersResponse { data }))
}

/// Register a member.
///
/// POST /api/users
///
/// Returns 201 for a new member and 200 with the existing record when the
/// email is already registered.
pub async fn create_member(
    State(state): State<AppState>,
    Json(request): Json<CreateMemberRequest>,
) -> Result<(StatusCode, Json<Member>), ApiError> {
    request.validate()?;

    let email = normalize_email(&request.email);
    let (member, created) = state
        .members
        .find_or_create(&normalize_name(&request.name), &email)
        .await?;

    if created {
        info!(member_id = %member.id, "Member created");
        Ok((StatusCode::CREATED, Json(member)))
    } else {
        Ok((StatusCode::OK, Json(member)))
    }
}
