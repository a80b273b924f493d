//! Account routes: register and login.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use leaflet_core::{User, UserId};
use leaflet_store::NewUser;
use serde::{Deserialize, Serialize};

use crate::auth;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::usecases::users;

/// Shortest accepted password.
const MIN_PASSWORD_LEN: usize = 8;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Returned by both register and login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub token: String,
    pub user_id: UserId,
    pub expires_in_hours: u64,
    pub user: User,
}

fn session(state: &AppState, user: User) -> ApiResult<SessionResponse> {
    let config = state.config();
    let token = auth::create_token(user.id, &config.jwt_secret, config.jwt_expiry_hours)?;
    Ok(SessionResponse {
        token,
        user_id: user.id,
        expires_in_hours: config.jwt_expiry_hours,
        user,
    })
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /auth/register
///
/// Responses: 201 with a session, 400 on a malformed body, 409 when the
/// email is taken.
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    if request.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let new_user = NewUser {
        name: request.name.trim().to_string(),
        email: request.email.trim().to_string(),
        password_hash: auth::hash_password(&request.password)?,
    };
    let user = users::register(state.repos(), &new_user).await?;

    Ok((StatusCode::CREATED, Json(session(&state, user)?)))
}

/// POST /auth/login
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let user = users::find_by_email(state.repos(), &request.email)
        .await?
        .ok_or_else(invalid)?;
    if !auth::verify_password(&request.password, &user.password_hash)? {
        return Err(invalid());
    }

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Json(session(&state, user)?))
}

/// Build auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}
