use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AcademicService;
use crate::models::ApiResponse;
use crate::models::academic::requests::GradeListParams;
use crate::services::error_response;
use crate::services::students::load_current_student;
use crate::utils::current_academic_year;

pub async fn list_grades(
    service: &AcademicService,
    request: &HttpRequest,
    query: GradeListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let student = match load_current_student(&storage, request).await {
        Ok(student) => student,
        Err(response) => return Ok(response),
    };

    let academic_year = query
        .academic_year
        .filter(|y| !y.trim().is_empty())
        .unwrap_or_else(current_academic_year);

    match storage.list_student_grades(student.id, &academic_year).await {
        Ok(grades) => Ok(HttpResponse::Ok().json(ApiResponse::success(grades, "ok"))),
        Err(e) => Ok(error_response(&e, "获取成绩失败")),
    }
}
