use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::academic::requests::{CreateGradeRequest, CreateHomeworkRequest};
use crate::models::announcements::requests::CreateAnnouncementRequest;
use crate::models::users::entities::UserRole;
use crate::services::TeacherService;
use crate::utils::SafeClassIdI64;

// 懒加载的全局 TeacherService 实例
static TEACHER_SERVICE: Lazy<TeacherService> = Lazy::new(TeacherService::new_lazy);

pub async fn get_dashboard(request: HttpRequest) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.get_dashboard(&request).await
}

pub async fn get_profile(request: HttpRequest) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.get_profile(&request).await
}

pub async fn list_classes(request: HttpRequest) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.list_classes(&request).await
}

pub async fn list_class_students(
    request: HttpRequest,
    class_id: SafeClassIdI64,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE
        .list_class_students(&request, class_id.0)
        .await
}

pub async fn mark_attendance(
    request: HttpRequest,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.mark_attendance(&request, payload).await
}

pub async fn create_homework(
    request: HttpRequest,
    homework: web::Json<CreateHomeworkRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE
        .create_homework(&request, homework.into_inner())
        .await
}

pub async fn create_grade(
    request: HttpRequest,
    grade: web::Json<CreateGradeRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE
        .create_grade(&request, grade.into_inner())
        .await
}

pub async fn create_announcement(
    request: HttpRequest,
    announcement: web::Json<CreateAnnouncementRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE
        .create_announcement(&request, announcement.into_inner())
        .await
}

// 配置路由，教师与管理员可访问
pub fn configure_teacher_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/teacher")
            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
            .route("/dashboard", web::get().to(get_dashboard))
            .route("/profile", web::get().to(get_profile))
            .route("/classes", web::get().to(list_classes))
            .route(
                "/classes/{class_id}/students",
                web::get().to(list_class_students),
            )
            .route("/attendance", web::post().to(mark_attendance))
            .route("/homework", web::post().to(create_homework))
            .route("/grades", web::post().to(create_grade))
            .route("/announcements", web::post().to(create_announcement)),
    );
}
