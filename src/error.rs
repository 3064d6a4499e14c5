/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - auth / transcription / repo のエラーを handler 境界で JSON に変換する
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::middleware::auth::AuthError;
use crate::repos::error::RepoError;
use crate::services::transcription::TranscriptionError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    BadRequest(String),
    #[error("{message}")]
    Upload { status: StatusCode, message: String },
    #[error("Transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),
    #[error(transparent)]
    Storage(#[from] RepoError),
    #[error("Route not found")]
    RouteNotFound { path: String },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Auth(err) => err.into_response(),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Unauthorized"})),
            )
                .into_response(),
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({"error": message}))).into_response()
            }
            AppError::Upload { status, message } => {
                (status, Json(json!({"error": message}))).into_response()
            }
            AppError::Transcription(err) => {
                tracing::error!(error = %err, "transcription failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": format!("Transcription failed: {}", err)})),
                )
                    .into_response()
            }
            AppError::Storage(err) => {
                tracing::error!(error = %err, "storage query failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"status": "error", "error": err.to_string()})),
                )
                    .into_response()
            }
            AppError::RouteNotFound { path } => (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "status": StatusCode::NOT_FOUND.as_u16(),
                    "message": "Route not found",
                    "path": path,
                })),
            )
                .into_response(),
        }
    }
}
