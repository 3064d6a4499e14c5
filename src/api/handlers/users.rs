/*
 * Responsibility
 * - GET /user-info: 認証済み subject を返す
 */
use axum::Json;

use crate::api::{dto::users::UserInfoResponse, extractors::AuthCtxExtractor};

pub async fn user_info(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<UserInfoResponse> {
    Json(UserInfoResponse {
        user_id: ctx.user_id,
    })
}
