use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::ApiResponse;

pub async fn get_profile(
    service: &StudentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service.current_student(request).await {
        Ok(student) => Ok(HttpResponse::Ok().json(ApiResponse::success(student, "ok"))),
        Err(response) => Ok(response),
    }
}
