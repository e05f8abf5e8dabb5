use serde::Serialize;

use super::entities::Student;
use crate::models::attendance::entities::{Attendance, AttendanceStats};
use crate::models::classes::entities::Class;

// 学生首页
#[derive(Debug, Serialize)]
pub struct StudentDashboardResponse {
    pub student: Student,
    pub class: Option<Class>,
    pub attendance_stats: AttendanceStats,
    pub recent_attendance: Vec<Attendance>,
    pub upcoming_quizzes: Vec<serde_json::Value>,
    pub pending_homework: Vec<serde_json::Value>,
}

// 学生考勤
#[derive(Debug, Serialize)]
pub struct StudentAttendanceResponse {
    pub attendance: Vec<Attendance>,
    pub stats: AttendanceStats,
}
