use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::ApiResponse;
use crate::models::attendance::entities::AttendanceStats;
use crate::models::students::responses::StudentAttendanceResponse;
use crate::services::error_response;
use crate::utils::academic_year::month_bounds;

const RECENT_ATTENDANCE_LIMIT: u64 = 30;

// 最近 30 条记录 + 本月统计
pub async fn get_attendance(
    service: &StudentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let student = match service.current_student(request).await {
        Ok(student) => student,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request);

    let attendance = match storage
        .list_student_attendance(student.id, RECENT_ATTENDANCE_LIMIT)
        .await
    {
        Ok(records) => records,
        Err(e) => return Ok(error_response(&e, "获取考勤记录失败")),
    };

    let (from, to) = month_bounds(chrono::Local::now().date_naive());
    let stats = match storage
        .list_student_attendance_between(student.id, &from, &to)
        .await
    {
        Ok(records) => AttendanceStats::from_records(&records),
        Err(e) => return Ok(error_response(&e, "获取考勤统计失败")),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        StudentAttendanceResponse { attendance, stats },
        "ok",
    )))
}
