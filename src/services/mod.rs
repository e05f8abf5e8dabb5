pub mod academic;
pub mod admin;
pub mod announcements;
pub mod auth;
pub mod classes;
pub mod files;
pub mod health;
pub mod students;
pub mod teachers;

pub use academic::AcademicService;
pub use admin::AdminService;
pub use announcements::AnnouncementService;
pub use auth::AuthService;
pub use classes::ClassService;
pub use files::FileService;
pub use health::HealthService;
pub use students::StudentService;
pub use teachers::TeacherService;

use actix_web::{HttpRequest, HttpResponse};

use crate::errors::SchoolSystemError;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};

/// 当前登录用户 ID，缺失时返回 401 响应
pub(crate) fn current_user_id(request: &HttpRequest) -> Result<i64, HttpResponse> {
    RequireJWT::extract_user_id(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user id",
        ))
    })
}

/// 存储层错误转为统一响应
pub(crate) fn error_response(err: &SchoolSystemError, context: &str) -> HttpResponse {
    let status = err.status_code();
    if status.is_server_error() {
        tracing::error!("{}: {}", context, err);
    }
    HttpResponse::build(status).json(ApiResponse::error_empty(
        ErrorCode::from(err),
        format!("{context}: {}", err.message()),
    ))
}
