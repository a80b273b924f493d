//! Workspace routes: CRUD, membership and the root page listing.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use leaflet_core::{Page, PageMeta, UserId, Workspace, WorkspaceId};
use leaflet_store::{NewWorkspace, WorkspaceUpdate};
use serde::{Deserialize, Serialize};

use crate::auth::AuthenticatedUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::usecases::pages::{self, CreatePage};
use crate::usecases::workspaces;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateWorkspaceRequest {
    pub name: String,
    pub icon: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateWorkspaceResponse {
    pub id: WorkspaceId,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateWorkspaceRequest {
    pub name: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WorkspaceListResponse {
    pub workspaces: Vec<Workspace>,
}

#[derive(Debug, Serialize)]
pub struct MembersResponse {
    pub members: Vec<UserId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct PageListResponse {
    pub pages: Vec<PageMeta>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePageRequest {
    pub title: String,
    pub icon: Option<String>,
    /// Parent page; omitted for a root page.
    pub parent_id: Option<String>,
}

fn workspace_not_found() -> ApiError {
    ApiError::NotFound("workspace".to_string())
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /workspaces
async fn list_workspaces(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<Json<WorkspaceListResponse>> {
    let workspaces = workspaces::list_workspaces(state.repos(), user.user_id).await?;
    Ok(Json(WorkspaceListResponse { workspaces }))
}

/// POST /workspaces
///
/// Creates the workspace with the caller as its only member and one root
/// page. Responses: 201 with the new id, 400 for a blank name.
async fn create_workspace(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateWorkspaceRequest>,
) -> ApiResult<(StatusCode, Json<CreateWorkspaceResponse>)> {
    let input = NewWorkspace {
        name: request.name,
        icon: request.icon,
    };
    let id = workspaces::create_workspace(state.repos(), user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(CreateWorkspaceResponse { id })))
}

/// GET /workspaces/{id}
///
/// Responses: 200, 403 for non-members, 404 for a malformed or unknown id.
async fn get_workspace(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Workspace>> {
    workspaces::get_workspace_by_id(state.repos(), user.user_id, &id)
        .await?
        .map(Json)
        .ok_or_else(workspace_not_found)
}

/// PATCH /workspaces/{id}
async fn update_workspace(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateWorkspaceRequest>,
) -> ApiResult<Json<Workspace>> {
    let update = WorkspaceUpdate {
        name: request.name,
        icon: request.icon,
    };
    Ok(Json(
        workspaces::update_workspace(state.repos(), user.user_id, &id, &update).await?,
    ))
}

/// DELETE /workspaces/{id}
async fn delete_workspace(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    workspaces::delete_workspace(state.repos(), user.user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /workspaces/{id}/members
async fn list_members(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MembersResponse>> {
    workspaces::get_all_members_by_workspace_id(state.repos(), user.user_id, &id)
        .await?
        .map(|members| Json(MembersResponse { members }))
        .ok_or_else(workspace_not_found)
}

/// POST /workspaces/{id}/members
///
/// Responses: 204, 404 when the workspace or the user does not exist.
async fn add_member(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<AddMemberRequest>,
) -> ApiResult<StatusCode> {
    workspaces::add_member(state.repos(), user.user_id, &id, &request.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /workspaces/{id}/members/{member_id}
///
/// Removing someone who is not a member still answers 204.
async fn remove_member(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, member_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    workspaces::remove_member(state.repos(), user.user_id, &id, &member_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /workspaces/{id}/pages - root pages only.
async fn list_root_pages(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<Json<PageListResponse>> {
    workspaces::get_root_pages(state.repos(), user.user_id, &id)
        .await?
        .map(|pages| Json(PageListResponse { pages }))
        .ok_or_else(workspace_not_found)
}

/// POST /workspaces/{id}/pages
async fn create_page(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<CreatePageRequest>,
) -> ApiResult<(StatusCode, Json<Page>)> {
    let input = CreatePage {
        title: request.title,
        icon: request.icon,
        parent_id: request.parent_id,
    };
    let page = pages::create_page(state.repos(), user.user_id, &id, input).await?;
    Ok((StatusCode::CREATED, Json(page)))
}

/// Build workspace routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/workspaces", get(list_workspaces).post(create_workspace))
        .route(
            "/workspaces/{id}",
            get(get_workspace)
                .patch(update_workspace)
                .delete(delete_workspace),
        )
        .route("/workspaces/{id}/members", get(list_members).post(add_member))
        .route("/workspaces/{id}/members/{member_id}", delete(remove_member))
        .route("/workspaces/{id}/pages", get(list_root_pages).post(create_page))
}
