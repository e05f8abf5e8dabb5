use serde::Deserialize;

// 班级列表查询参数
#[derive(Debug, Deserialize)]
pub struct ClassListParams {
    pub academic_year: Option<String>,
}

// 创建班级请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClassRequest {
    pub name: String,
    pub grade: i32,
    pub section: Option<String>,
    pub academic_year: Option<String>,
    pub room_number: Option<String>,
    pub class_teacher_id: Option<i64>,
}
