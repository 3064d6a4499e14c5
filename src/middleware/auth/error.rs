//! Auth Gate failure kinds. Each has a fixed status, type tag and message.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization token is required")]
    MissingToken,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Insufficient permissions for this resource")]
    InsufficientPermissions,
    #[error("Internal authentication error")]
    InternalError,
}

#[derive(Debug, Serialize)]
struct AuthErrorBody {
    #[serde(rename = "type")]
    kind: &'static str,
    message: &'static str,
    code: u16,
}

impl AuthError {
    pub const fn status(self) -> StatusCode {
        match self {
            Self::MissingToken | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::InsufficientPermissions => StatusCode::FORBIDDEN,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub const fn kind(self) -> &'static str {
        match self {
            Self::MissingToken => "missing_token",
            Self::InvalidToken => "invalid_token",
            Self::InsufficientPermissions => "insufficient_permissions",
            Self::InternalError => "internal_error",
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::MissingToken => "Authorization token is required",
            Self::InvalidToken => "Invalid or expired token",
            Self::InsufficientPermissions => "Insufficient permissions for this resource",
            Self::InternalError => "Internal authentication error",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = AuthErrorBody {
            kind: self.kind(),
            message: self.message(),
            code: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}
