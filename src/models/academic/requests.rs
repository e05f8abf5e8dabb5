use serde::Deserialize;

// 作业列表查询
#[derive(Debug, Deserialize)]
pub struct HomeworkListParams {
    pub status: Option<String>,
}

// 成绩查询
#[derive(Debug, Deserialize)]
pub struct GradeListParams {
    pub academic_year: Option<String>,
}

// 提交作业
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitHomeworkRequest {
    pub submission_text: Option<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
}

// 创建科目
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubjectRequest {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    #[serde(default)]
    pub grade_levels: Vec<i32>,
    #[serde(default = "default_credits")]
    pub credits: i32,
    #[serde(default)]
    pub is_optional: bool,
}

fn default_credits() -> i32 {
    1
}

// 教师布置作业（来自HTTP请求，due_date 为 RFC3339）
#[derive(Debug, Deserialize)]
pub struct CreateHomeworkRequest {
    pub title: String,
    pub description: Option<String>,
    pub class_id: i64,
    pub subject_id: Option<i64>,
    pub due_date: String,
    pub max_marks: Option<i32>,
    #[serde(default)]
    pub attachments: Vec<String>,
}

// 作业写入（存储层）
#[derive(Debug, Clone)]
pub struct NewHomework {
    pub title: String,
    pub description: Option<String>,
    pub class_id: i64,
    pub subject_id: Option<i64>,
    pub teacher_id: i64,
    pub due_date: i64,
    pub max_marks: i32,
    pub attachments: Vec<String>,
}

// 教师录入成绩（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct CreateGradeRequest {
    pub student_id: i64,
    pub subject_id: i64,
    pub exam_type: String,
    pub exam_name: Option<String>,
    pub max_marks: f64,
    pub marks_obtained: f64,
    pub grade: Option<String>,
    pub remarks: Option<String>,
    pub exam_date: Option<String>,
}

// 成绩写入（存储层）
#[derive(Debug, Clone)]
pub struct NewGrade {
    pub student_id: i64,
    pub subject_id: i64,
    pub exam_type: String,
    pub exam_name: Option<String>,
    pub max_marks: f64,
    pub marks_obtained: f64,
    pub grade: Option<String>,
    pub remarks: Option<String>,
    pub graded_by: i64,
    pub exam_date: Option<String>,
    pub academic_year: String,
}
