/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - Auth Gate が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - session token の検証は middleware/services 側の責務
 * - リクエストをまたいで保持しない
 */

use crate::services::auth::SessionClaims;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `user_id` は identity provider の subject (`sub`)
/// - `claims` は検証済みの session claims 全体
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub user_id: String,
    pub claims: SessionClaims,
}

impl AuthCtx {
    pub fn new(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub.clone(),
            claims,
        }
    }
}
