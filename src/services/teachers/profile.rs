use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TeacherService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;
use crate::utils::current_academic_year;

pub async fn get_profile(
    service: &TeacherService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service.current_teacher(request).await {
        Ok(teacher) => Ok(HttpResponse::Ok().json(ApiResponse::success(teacher, "ok"))),
        Err(response) => Ok(response),
    }
}

pub async fn list_classes(
    service: &TeacherService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let teacher = match service.current_teacher(request).await {
        Ok(teacher) => teacher,
        Err(response) => return Ok(response),
    };

    match service
        .get_storage(request)
        .list_teacher_assignments(teacher.id, &current_academic_year())
        .await
    {
        Ok(assignments) => Ok(HttpResponse::Ok().json(ApiResponse::success(assignments, "ok"))),
        Err(e) => Ok(error_response(&e, "获取任课班级失败")),
    }
}

pub async fn list_class_students(
    service: &TeacherService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    if let Err(response) = service.current_teacher(request).await {
        return Ok(response);
    }
    let storage = service.get_storage(request);

    match storage.get_class_by_id(class_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassNotFound,
                "Class not found",
            )));
        }
        Err(e) => return Ok(error_response(&e, "获取班级失败")),
    }

    match storage.list_class_students(class_id).await {
        Ok(students) => Ok(HttpResponse::Ok().json(ApiResponse::success(students, "ok"))),
        Err(e) => Ok(error_response(&e, "获取班级学生失败")),
    }
}
