pub mod attendance;
pub mod dashboard;
pub mod profile;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::students::entities::Student;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user_id, error_response};
use crate::storage::Storage;

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

impl StudentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 学生首页
    pub async fn get_dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        dashboard::get_dashboard(self, request).await
    }

    // 学生档案
    pub async fn get_profile(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        profile::get_profile(self, request).await
    }

    // 学生考勤
    pub async fn get_attendance(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        attendance::get_attendance(self, request).await
    }

    pub(crate) async fn current_student(
        &self,
        request: &HttpRequest,
    ) -> Result<Student, HttpResponse> {
        load_current_student(&self.get_storage(request), request).await
    }
}

/// 当前登录用户对应的学生档案，不存在时返回 404 响应
pub(crate) async fn load_current_student(
    storage: &Arc<dyn Storage>,
    request: &HttpRequest,
) -> Result<Student, HttpResponse> {
    let user_id = current_user_id(request)?;
    match storage.get_student_by_user_id(user_id).await {
        Ok(Some(student)) => Ok(student),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Student profile not found. Please contact admin.",
        ))),
        Err(e) => Err(error_response(&e, "获取学生档案失败")),
    }
}
