//! Account handlers issuing bearer tokens for the task API

use crate::api::models::{Credentials, TokenResponse};
use crate::auth::UserRegistry;
use crate::error::{AppError, Result};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Run an argon2 bound registry call off the async workers
async fn with_users<T, F>(users: &Arc<UserRegistry>, op: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&UserRegistry) -> Result<T> + Send + 'static,
{
    let users = Arc::clone(users);
    tokio::task::spawn_blocking(move || op(&users))
        .await
        .map_err(|e| AppError::Internal(format!("Password task failed: {}", e)))?
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = Credentials,
    responses(
        (status = 201, description = "Registered"),
        (status = 400, description = "User exists or credentials missing")
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> Response {
    let (username, password) = (credentials.username.clone(), credentials.password);
    match with_users(&state.users, move |users| users.register(&username, &password)).await {
        Ok(()) => (StatusCode::CREATED, "Registered").into_response(),
        Err(AppError::Conflict(message)) => {
            warn!(username = %credentials.username, "Registration for existing user");
            (StatusCode::BAD_REQUEST, message).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = Credentials,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> Response {
    let (username, password) = (credentials.username.clone(), credentials.password);
    if let Err(e) = with_users(&state.users, move |users| users.verify(&username, &password)).await {
        warn!(username = %credentials.username, "Login failed");
        return match e {
            AppError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message).into_response(),
            other => other.into_response(),
        };
    }

    match state.tokens.issue(&credentials.username) {
        Ok(token) => {
            info!(username = %credentials.username, "Token issued");
            Json(TokenResponse { token }).into_response()
        }
        Err(e) => e.into_response(),
    }
}
