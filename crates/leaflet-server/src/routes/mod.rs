//! Route definitions for the HTTP API.

pub mod auth;
pub mod health;
pub mod pages;
pub mod users;
pub mod workspaces;

use axum::Router;

use crate::state::AppState;

/// Build the complete router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(users::routes())
        .merge(workspaces::routes())
        .merge(pages::routes())
        .with_state(state)
}
