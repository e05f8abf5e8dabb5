use serde::Deserialize;

use crate::models::users::requests::UpdateUserRequest;

// 用户登录请求
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// 用户注册请求
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: String,
    pub phone: Option<String>,
}

// 更新个人资料
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub profile_picture_url: Option<String>,
}

impl From<UpdateProfileRequest> for UpdateUserRequest {
    fn from(req: UpdateProfileRequest) -> Self {
        UpdateUserRequest {
            full_name: req.full_name,
            phone: req.phone,
            profile_picture_url: req.profile_picture_url,
            ..Default::default()
        }
    }
}
