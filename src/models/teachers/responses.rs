use serde::Serialize;

use super::entities::{Teacher, TeacherAssignment};
use crate::models::academic::entities::TimetableEntry;
use crate::models::announcements::entities::Announcement;

// 教师首页
#[derive(Debug, Serialize)]
pub struct TeacherDashboardResponse {
    pub teacher: Teacher,
    pub assignments: Vec<TeacherAssignment>,
    pub today_schedule: Vec<TimetableEntry>,
    pub total_students: u64,
    pub pending_submissions: u64,
    pub recent_announcements: Vec<Announcement>,
}

// 点名结果
#[derive(Debug, Serialize)]
pub struct MarkAttendanceResponse {
    pub message: String,
    pub photo_url: String,
}
