use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::ApiResponse;
use crate::models::classes::requests::ClassListParams;
use crate::services::error_response;
use crate::utils::current_academic_year;

pub async fn list_classes(
    service: &ClassService,
    request: &HttpRequest,
    query: ClassListParams,
) -> ActixResult<HttpResponse> {
    let academic_year = query
        .academic_year
        .filter(|y| !y.trim().is_empty())
        .unwrap_or_else(current_academic_year);

    match service
        .get_storage(request)
        .list_classes(&academic_year)
        .await
    {
        Ok(classes) => Ok(HttpResponse::Ok().json(ApiResponse::success(classes, "ok"))),
        Err(e) => Ok(error_response(&e, "获取班级列表失败")),
    }
}
