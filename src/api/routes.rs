//! API route handlers

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

use super::server::SharedState;
use crate::auth::{token_from_headers, AuthError, CurrentUser, LoginBody, StatusResponse, WhoamiResponse};

// Health check

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

// Session routes

/// Who owns the session cookie, if anyone
pub async fn whoami(user: CurrentUser) -> Json<WhoamiResponse> {
    Json(WhoamiResponse::user(user.account.username))
}

pub async fn login(
    State(state): State<SharedState>,
    LoginBody(req): LoginBody,
) -> Result<impl IntoResponse, AuthError> {
    let credentials = Arc::clone(&state.credentials);

    // bcrypt is deliberately slow; keep it off the async workers
    let account = tokio::task::spawn_blocking(move || {
        credentials.authenticate(&req.username, &req.password)
    })
    .await
    .map_err(|e| {
        tracing::error!("Password verification task failed: {}", e);
        AuthError::Internal
    })?
    .ok_or_else(|| {
        tracing::info!("Login rejected");
        AuthError::InvalidCredentials
    })?;

    let token = state.sessions.create(account.id).await;
    tracing::info!(user_id = account.id, "Login succeeded");

    Ok((
        [(header::SET_COOKIE, state.cookies.session_cookie(&token))],
        Json(StatusResponse::ok()),
    ))
}

pub async fn logout(State(state): State<SharedState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = token_from_headers(&headers, &state.cookies.name) {
        state.sessions.revoke(&token).await;
        tracing::debug!("Session revoked");
    }

    (
        [(header::SET_COOKIE, state.cookies.clear_cookie())],
        Json(StatusResponse::ok()),
    )
}
