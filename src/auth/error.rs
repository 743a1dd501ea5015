//! Client-facing authentication errors
//!
//! Every variant renders to a fixed body. Nothing about the underlying cause
//! reaches the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::auth::models::{StatusResponse, WhoamiResponse};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const INVALID_REQUEST: &str = "Invalid request";
pub const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown username or wrong password
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Missing, unknown or expired session token
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("malformed request")]
    MalformedRequest,

    #[error("internal error")]
    Internal,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::MalformedRequest => StatusCode::BAD_REQUEST,
            AuthError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            AuthError::Unauthenticated => (status, Json(WhoamiResponse::anonymous())).into_response(),
            AuthError::InvalidCredentials => {
                (status, Json(StatusResponse::failure(INVALID_CREDENTIALS))).into_response()
            }
            AuthError::MalformedRequest => {
                (status, Json(StatusResponse::failure(INVALID_REQUEST))).into_response()
            }
            AuthError::Internal => (status, Json(StatusResponse::failure(INTERNAL_ERROR))).into_response(),
        }
    }
}
