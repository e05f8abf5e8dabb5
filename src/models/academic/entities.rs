use serde::{Deserialize, Serialize};

// 科目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub grade_levels: Vec<i32>,
    pub credits: i32,
    pub is_optional: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 课表条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableEntry {
    pub id: i64,
    pub class_id: i64,
    pub day_of_week: i32,
    pub period_number: i32,
    pub subject_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub start_time: String,
    pub end_time: String,
    pub room_number: Option<String>,
    pub academic_year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_name: Option<String>,
}

// 作业
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Homework {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub class_id: i64,
    pub subject_id: Option<i64>,
    pub teacher_id: i64,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub max_marks: i32,
    pub attachments: Vec<String>,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_name: Option<String>,
}

// 作业提交
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeworkSubmission {
    pub id: i64,
    pub homework_id: i64,
    pub student_id: i64,
    pub submission_text: Option<String>,
    pub attachments: Vec<String>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub marks_obtained: Option<f64>,
    pub feedback: Option<String>,
    pub graded_by: Option<i64>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub status: String,
}

// 成绩
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grade {
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub exam_type: String,
    pub exam_name: Option<String>,
    pub max_marks: f64,
    pub marks_obtained: f64,
    pub grade: Option<String>,
    pub remarks: Option<String>,
    pub graded_by: Option<i64>,
    pub exam_date: Option<String>,
    pub academic_year: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_name: Option<String>,
}
