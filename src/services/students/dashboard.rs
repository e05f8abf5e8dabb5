use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use super::StudentService;
use crate::models::ApiResponse;
use crate::models::attendance::entities::AttendanceStats;
use crate::models::students::responses::StudentDashboardResponse;
use crate::utils::academic_year::month_bounds;

const RECENT_ATTENDANCE_DAYS: u64 = 7;

pub async fn get_dashboard(
    service: &StudentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let student = match service.current_student(request).await {
        Ok(student) => student,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request);

    // 班级信息，查询失败不影响首页
    let class = match student.class_id {
        Some(class_id) => storage.get_class_by_id(class_id).await.unwrap_or_else(|e| {
            warn!("Failed to load class {} for dashboard: {}", class_id, e);
            None
        }),
        None => None,
    };

    // 本月出勤统计
    let (from, to) = month_bounds(chrono::Local::now().date_naive());
    let attendance_stats = match storage
        .list_student_attendance_between(student.id, &from, &to)
        .await
    {
        Ok(records) => AttendanceStats::from_records(&records),
        Err(e) => {
            warn!("Failed to load attendance stats for student {}: {}", student.id, e);
            AttendanceStats::default()
        }
    };

    let recent_attendance = storage
        .list_student_attendance(student.id, RECENT_ATTENDANCE_DAYS)
        .await
        .unwrap_or_else(|e| {
            warn!("Failed to load recent attendance for student {}: {}", student.id, e);
            Vec::new()
        });

    let response = StudentDashboardResponse {
        student,
        class,
        attendance_stats,
        recent_attendance,
        upcoming_quizzes: Vec::new(),
        pending_homework: Vec::new(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "ok")))
}
