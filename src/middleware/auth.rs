//! Bearer token authentication middleware

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::AppState;

/// Pull the token out of an `Authorization: Bearer <token>` header
pub fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Reject requests without a valid token; 401 when absent, 403 when invalid
///
/// On success the decoded [`crate::auth::Claims`] are added to the request
/// extensions.
pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&request) else {
        debug!(path = %request.uri().path(), "Request without bearer token");
        return (StatusCode::UNAUTHORIZED, "Missing bearer token").into_response();
    };

    match state.tokens.validate(&token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            warn!(error = %e, "Rejected bearer token");
            (StatusCode::FORBIDDEN, "Invalid token").into_response()
        }
    }
}
