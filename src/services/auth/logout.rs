use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;

// 令牌无状态，服务端不做吊销
pub async fn handle_logout(request: &HttpRequest) -> ActixResult<HttpResponse> {
    if let Some(user_id) = RequireJWT::extract_user_id(request) {
        tracing::debug!("User {} logged out", user_id);
    }
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Logged out successfully")))
}
