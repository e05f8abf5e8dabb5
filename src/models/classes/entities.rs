use serde::{Deserialize, Serialize};

// 班级实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    pub id: i64,
    pub name: String,
    pub grade: i32,
    pub section: Option<String>,
    pub academic_year: String,
    pub total_students: i32,
    pub room_number: Option<String>,
    pub class_teacher_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
