use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Datelike;
use tracing::warn;

use super::TeacherService;
use crate::models::ApiResponse;
use crate::models::teachers::responses::TeacherDashboardResponse;
use crate::services::error_response;
use crate::utils::current_academic_year;

const RECENT_ANNOUNCEMENTS: u64 = 5;

pub async fn get_dashboard(
    service: &TeacherService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let teacher = match service.current_teacher(request).await {
        Ok(teacher) => teacher,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request);
    let academic_year = current_academic_year();

    let assignments = match storage
        .list_teacher_assignments(teacher.id, &academic_year)
        .await
    {
        Ok(assignments) => assignments,
        Err(e) => return Ok(error_response(&e, "获取任课信息失败")),
    };

    // 0 = 周日
    let today = chrono::Local::now().weekday().num_days_from_sunday() as i32;
    let today_schedule = storage
        .list_teacher_schedule(teacher.id, today, &academic_year)
        .await
        .unwrap_or_else(|e| {
            warn!("Failed to load schedule for teacher {}: {}", teacher.id, e);
            Vec::new()
        });

    let mut class_ids: Vec<i64> = assignments.iter().map(|a| a.class_id).collect();
    class_ids.sort_unstable();
    class_ids.dedup();
    let total_students = storage
        .count_students_in_classes(&class_ids)
        .await
        .unwrap_or_else(|e| {
            warn!("Failed to count students for teacher {}: {}", teacher.id, e);
            0
        });

    let pending_submissions = storage
        .count_pending_submissions(teacher.id)
        .await
        .unwrap_or_else(|e| {
            warn!("Failed to count pending submissions for teacher {}: {}", teacher.id, e);
            0
        });

    let recent_announcements = storage
        .list_announcements(RECENT_ANNOUNCEMENTS)
        .await
        .unwrap_or_else(|e| {
            warn!("Failed to load announcements for dashboard: {}", e);
            Vec::new()
        });

    let response = TeacherDashboardResponse {
        teacher,
        assignments,
        today_schedule,
        total_students,
        pending_submissions,
        recent_announcements,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "ok")))
}
