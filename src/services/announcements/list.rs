use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AnnouncementService;
use crate::models::ApiResponse;
use crate::models::announcements::requests::AnnouncementListParams;
use crate::services::error_response;

const DEFAULT_LIMIT: u64 = 20;
const MAX_LIMIT: u64 = 100;

pub async fn list_announcements(
    service: &AnnouncementService,
    request: &HttpRequest,
    query: AnnouncementListParams,
) -> ActixResult<HttpResponse> {
    let limit = query
        .limit
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_LIMIT)
        .min(MAX_LIMIT);

    match service.get_storage(request).list_announcements(limit).await {
        Ok(announcements) => Ok(HttpResponse::Ok().json(ApiResponse::success(announcements, "ok"))),
        Err(e) => Ok(error_response(&e, "获取公告失败")),
    }
}
