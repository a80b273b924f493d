//! Routes for the signed-in user: profile, workspace list and favorites.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use leaflet_core::User;
use leaflet_store::UserUpdate;
use serde::Deserialize;

use super::workspaces::WorkspaceListResponse;
use crate::auth::AuthenticatedUser;
use crate::error::ApiResult;
use crate::state::AppState;
use crate::usecases::{users, workspaces};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for PATCH /users/me. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub preferences: Option<serde_json::Value>,
    pub profile_picture: Option<String>,
}

impl From<UpdateProfileRequest> for UserUpdate {
    fn from(request: UpdateProfileRequest) -> Self {
        Self {
            name: request.name,
            preferences: request.preferences,
            profile_picture: request.profile_picture,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    pub workspace_id: String,
    pub page_id: String,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /users/me
async fn get_me(State(state): State<AppState>, user: AuthenticatedUser) -> ApiResult<Json<User>> {
    Ok(Json(users::get_profile(state.repos(), user.user_id).await?))
}

/// PATCH /users/me
async fn update_me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<UpdateProfileRequest>,
) -> ApiResult<Json<User>> {
    let update = UserUpdate::from(request);
    Ok(Json(
        users::update_profile(state.repos(), user.user_id, &update).await?,
    ))
}

/// DELETE /users/me
async fn delete_me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<StatusCode> {
    users::delete_account(state.repos(), user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /users/me/workspaces
async fn my_workspaces(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<Json<WorkspaceListResponse>> {
    let workspaces = workspaces::list_workspaces(state.repos(), user.user_id).await?;
    Ok(Json(WorkspaceListResponse { workspaces }))
}

/// POST /users/me/favorites
///
/// Responses: 204, 403 when the workspace is not the user's, 404 for an
/// unknown workspace.
async fn add_favorite(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<FavoriteRequest>,
) -> ApiResult<StatusCode> {
    users::add_favorite(
        state.repos(),
        user.user_id,
        &request.workspace_id,
        &request.page_id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /users/me/favorites/{workspace_id}/{page_id}
async fn remove_favorite(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((workspace_id, page_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    users::remove_favorite(state.repos(), user.user_id, &workspace_id, &page_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Build user routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(get_me).patch(update_me).delete(delete_me))
        .route("/users/me/workspaces", get(my_workspaces))
        .route("/users/me/favorites", post(add_favorite))
        .route(
            "/users/me/favorites/{workspace_id}/{page_id}",
            delete(remove_favorite),
        )
}
