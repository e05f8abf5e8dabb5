use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use super::AdminService;
use crate::models::ApiResponse;
use crate::models::admin::responses::{AdminDashboardResponse, FeeStats};
use crate::services::error_response;

const RECENT_ACTIVITY: u64 = 10;

pub async fn get_dashboard(
    service: &AdminService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let counts = async {
        Ok::<_, crate::errors::SchoolSystemError>((
            storage.count_users(None).await?,
            storage.count_students().await?,
            storage.count_teachers().await?,
            storage.count_classes().await?,
        ))
    };
    let (total_users, total_students, total_teachers, total_classes) = match counts.await {
        Ok(counts) => counts,
        Err(e) => return Ok(error_response(&e, "获取统计数据失败")),
    };

    let fee_collection = match storage.list_student_fees().await {
        Ok(fees) => FeeStats::from_fees(&fees),
        Err(e) => {
            warn!("Failed to load fee stats for dashboard: {}", e);
            FeeStats::default()
        }
    };

    let recent_activity = storage
        .list_audit_logs(RECENT_ACTIVITY)
        .await
        .unwrap_or_else(|e| {
            warn!("Failed to load recent activity for dashboard: {}", e);
            Vec::new()
        });

    let response = AdminDashboardResponse {
        total_users,
        total_students,
        total_teachers,
        total_classes,
        fee_collection,
        recent_activity,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "ok")))
}
