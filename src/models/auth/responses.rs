use crate::models::users::entities::User;
use serde::Serialize;

// 登录 / 注册响应
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}
