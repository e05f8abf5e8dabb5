use serde::{Deserialize, Serialize};

// 教师档案
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    pub id: i64,
    pub user_id: i64,
    pub employee_id: String,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub qualifications: Option<String>,
    pub subjects_taught: Vec<String>,
    pub experience_years: i32,
    pub joining_date: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

// 任课信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherAssignment {
    pub id: i64,
    pub teacher_id: i64,
    pub class_id: i64,
    pub subject_id: Option<i64>,
    pub is_class_teacher: bool,
    pub academic_year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_name: Option<String>,
}
