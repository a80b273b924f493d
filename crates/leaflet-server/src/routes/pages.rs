//! Page routes: read, edit, rename, delete and the subtree listing.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use leaflet_core::Page;
use leaflet_store::PageUpdate;
use serde::Deserialize;

use super::workspaces::PageListResponse;
use crate::auth::AuthenticatedUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::usecases::pages;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for PATCH /pages/{id}. Absent fields are left unchanged;
/// a `title` renames the page.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePageRequest {
    pub title: Option<String>,
    pub icon: Option<String>,
    pub cover_image: Option<String>,
    pub content: Option<serde_json::Value>,
    pub settings: Option<serde_json::Value>,
}

impl UpdatePageRequest {
    fn body_update(&self) -> PageUpdate {
        PageUpdate {
            icon: self.icon.clone(),
            cover_image: self.cover_image.clone(),
            content: self.content.clone(),
            settings: self.settings.clone(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /pages/{id}
async fn get_page(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Page>> {
    pages::get_page(state.repos(), user.user_id, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("page".to_string()))
}

/// PATCH /pages/{id}
///
/// A title change is applied first, then the body fields.
async fn update_page(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<UpdatePageRequest>,
) -> ApiResult<Json<Page>> {
    let repos = state.repos();
    if let Some(title) = &request.title {
        pages::update_page_title(repos, user.user_id, &id, title).await?;
    }
    let page = pages::update_page(repos, user.user_id, &id, &request.body_update()).await?;
    Ok(Json(page))
}

/// DELETE /pages/{id} - removes the page and everything below it.
async fn delete_page(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    pages::delete_page(state.repos(), user.user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /pages/{id}/children - all descendants, not only direct children.
async fn list_children(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<Json<PageListResponse>> {
    let pages = pages::get_children(state.repos(), user.user_id, &id).await?;
    Ok(Json(PageListResponse { pages }))
}

/// Build page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/pages/{id}",
            get(get_page).patch(update_page).delete(delete_page),
        )
        .route("/pages/{id}/children", get(list_children))
}
