use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AcademicService;
use crate::models::academic::responses::TimetableResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;
use crate::services::students::load_current_student;
use crate::utils::current_academic_year;

pub async fn get_timetable(
    service: &AcademicService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let student = match load_current_student(&storage, request).await {
        Ok(student) => student,
        Err(response) => return Ok(response),
    };

    let Some(class_id) = student.class_id else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassNotFound,
            "Student is not assigned to a class",
        )));
    };

    let academic_year = current_academic_year();
    match storage.list_class_timetable(class_id, &academic_year).await {
        Ok(entries) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            TimetableResponse::group_by_day(class_id, academic_year, entries),
            "ok",
        ))),
        Err(e) => Ok(error_response(&e, "获取课表失败")),
    }
}
