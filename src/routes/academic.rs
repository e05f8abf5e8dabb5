use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::academic::requests::{
    CreateSubjectRequest, GradeListParams, HomeworkListParams, SubmitHomeworkRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::AcademicService;
use crate::utils::SafeIDI64;

// 懒加载的全局 AcademicService 实例
static ACADEMIC_SERVICE: Lazy<AcademicService> = Lazy::new(AcademicService::new_lazy);

pub async fn get_timetable(request: HttpRequest) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.get_timetable(&request).await
}

pub async fn list_homework(
    request: HttpRequest,
    query: web::Query<HomeworkListParams>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .list_homework(&request, query.into_inner())
        .await
}

pub async fn get_homework(request: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.get_homework(&request, id.0).await
}

pub async fn submit_homework(
    request: HttpRequest,
    id: SafeIDI64,
    submission: web::Json<SubmitHomeworkRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .submit_homework(&request, id.0, submission.into_inner())
        .await
}

pub async fn list_grades(
    request: HttpRequest,
    query: web::Query<GradeListParams>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .list_grades(&request, query.into_inner())
        .await
}

pub async fn list_subjects(request: HttpRequest) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.list_subjects(&request).await
}

pub async fn create_subject(
    request: HttpRequest,
    subject: web::Json<CreateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .create_subject(&request, subject.into_inner())
        .await
}

// 配置路由
pub fn configure_academic_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/academic")
            .route("/timetable", web::get().to(get_timetable))
            .route("/homework", web::get().to(list_homework))
            .route("/homework/{id}", web::get().to(get_homework))
            .route("/homework/{id}/submit", web::post().to(submit_homework))
            .route("/grades", web::get().to(list_grades))
            .service(
                web::resource("/subjects")
                    .route(web::get().to(list_subjects))
                    .route(
                        web::post()
                            .to(create_subject)
                            // 科目由管理员维护
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}
