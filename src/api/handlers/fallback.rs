/*
 * Responsibility
 * - どのルートにも一致しなかったリクエストの 404 (path を返す)
 */
use axum::extract::OriginalUri;

use crate::error::AppError;

pub async fn not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::RouteNotFound {
        path: uri.path().to_string(),
    }
}
