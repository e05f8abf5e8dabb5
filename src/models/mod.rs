//! 数据模型定义
//!
//! 请求/响应结构体与业务实体，和 `entity` 模块中的数据库实体分离。

pub mod academic;
pub mod admin;
pub mod announcements;
pub mod attendance;
pub mod auth;
pub mod classes;
pub mod common;
pub mod fees;
pub mod health;
pub mod students;
pub mod teachers;
pub mod users;

pub use common::{ApiResponse, PaginationInfo, PaginationQuery};

use serde::Serialize;

/// 记录程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码，随 ApiResponse 返回给前端
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1002,
    NotFound = 1003,
    Conflict = 1004,
    InternalServerError = 1005,
    RateLimitExceeded = 1006,

    // 认证与用户
    AuthFailed = 2000,
    RegisterFailed = 2001,
    UserNotFound = 2002,
    UserEmailAlreadyExists = 2003,
    UserEmailInvalid = 2004,
    UserPasswordInvalid = 2005,
    UserRoleInvalid = 2006,
    UserNameInvalid = 2007,
    UserUpdateFailed = 2008,
    UserDeleteFailed = 2009,
    CanNotDeleteCurrentUser = 2010,

    // 学生、教师、班级
    StudentNotFound = 3000,
    TeacherNotFound = 3001,
    ClassNotFound = 3002,
    ClassCreationFailed = 3003,
    SubjectAlreadyExists = 3004,
    ProfileCreationFailed = 3005,

    // 作业与成绩
    HomeworkNotFound = 4000,
    HomeworkSubmitFailed = 4001,
    HomeworkCreationFailed = 4002,
    GradeCreationFailed = 4003,
    AnnouncementCreationFailed = 4004,

    // 考勤
    AttendanceInvalid = 5000,
    AttendanceMarkFailed = 5001,

    // 收费
    FeeNotFound = 6000,
    PaymentInvalid = 6001,
    PaymentFailed = 6002,

    // 文件
    FileUploadFailed = 7000,
    FileTypeNotAllowed = 7001,
    FileSizeExceeded = 7002,
    FileNotFound = 7003,
    MultifileUploadNotAllowed = 7004,
}

impl From<&crate::errors::SchoolSystemError> for ErrorCode {
    fn from(err: &crate::errors::SchoolSystemError) -> Self {
        use crate::errors::SchoolSystemError;
        match err {
            SchoolSystemError::NotFound(_) => ErrorCode::NotFound,
            SchoolSystemError::Conflict(_) => ErrorCode::Conflict,
            SchoolSystemError::Validation(_) | SchoolSystemError::DateParse(_) => {
                ErrorCode::BadRequest
            }
            SchoolSystemError::Authentication(_) => ErrorCode::Unauthorized,
            SchoolSystemError::Authorization(_) => ErrorCode::Forbidden,
            _ => ErrorCode::InternalServerError,
        }
    }
}
