pub mod announcements;
pub mod attendance;
pub mod dashboard;
pub mod grades;
pub mod homework;
pub mod profile;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::academic::requests::{CreateGradeRequest, CreateHomeworkRequest};
use crate::models::announcements::requests::CreateAnnouncementRequest;
use crate::models::teachers::entities::Teacher;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::FileService;
use crate::services::{current_user_id, error_response};
use crate::storage::Storage;

pub struct TeacherService {
    storage: Option<Arc<dyn Storage>>,
    files: FileService,
}

impl TeacherService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            files: FileService::new_lazy(),
        }
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

    pub(crate) fn files(&self) -> &FileService {
        &self.files
    }

    /// 当前登录用户对应的教师档案，不存在时返回 404 响应
    pub(crate) async fn current_teacher(
        &self,
        request: &HttpRequest,
    ) -> Result<Teacher, HttpResponse> {
        let user_id = current_user_id(request)?;
        match self.get_storage(request).get_teacher_by_user_id(user_id).await {
            Ok(Some(teacher)) => Ok(teacher),
            Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::TeacherNotFound,
                "Teacher profile not found. Please contact admin.",
            ))),
            Err(e) => Err(error_response(&e, "获取教师档案失败")),
        }
    }

    // 教师首页
    pub async fn get_dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        dashboard::get_dashboard(self, request).await
    }

    // 教师档案
    pub async fn get_profile(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        profile::get_profile(self, request).await
    }

    // 本学年任课班级
    pub async fn list_classes(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        profile::list_classes(self, request).await
    }

    // 班级学生名单
    pub async fn list_class_students(
        &self,
        request: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        profile::list_class_students(self, request, class_id).await
    }

    // 点名（multipart，可附照片）
    pub async fn mark_attendance(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        attendance::mark_attendance(self, request, payload).await
    }

    // 布置作业
    pub async fn create_homework(
        &self,
        request: &HttpRequest,
        homework: CreateHomeworkRequest,
    ) -> ActixResult<HttpResponse> {
        homework::create_homework(self, request, homework).await
    }

    // 录入成绩
    pub async fn create_grade(
        &self,
        request: &HttpRequest,
        grade: CreateGradeRequest,
    ) -> ActixResult<HttpResponse> {
        grades::create_grade(self, request, grade).await
    }

    // 发布公告
    pub async fn create_announcement(
        &self,
        request: &HttpRequest,
        announcement: CreateAnnouncementRequest,
    ) -> ActixResult<HttpResponse> {
        announcements::create_announcement(self, request, announcement).await
    }
}
