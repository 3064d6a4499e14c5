use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct UserInfoResponse {
    pub user_id: String,
}
