use serde::Deserialize;

// 管理员创建学生（用户 + 档案）
#[derive(Debug, Deserialize)]
pub struct CreateStudentRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub admission_number: String,
    pub roll_number: Option<String>,
    pub class_id: Option<i64>,
    pub section: Option<String>,
    pub date_of_birth: String,
    pub gender: String,
    pub blood_group: Option<String>,
    pub address: Option<String>,
    pub parent_name: Option<String>,
    pub parent_email: Option<String>,
    pub parent_phone: Option<String>,
    pub emergency_contact: Option<String>,
    pub admission_date: Option<String>,
    pub academic_year: Option<String>,
}

// 学生档案（存储层）
#[derive(Debug, Clone)]
pub struct NewStudentProfile {
    pub admission_number: String,
    pub roll_number: Option<String>,
    pub class_id: Option<i64>,
    pub section: Option<String>,
    pub date_of_birth: String,
    pub gender: String,
    pub blood_group: Option<String>,
    pub address: Option<String>,
    pub parent_name: Option<String>,
    pub parent_email: Option<String>,
    pub parent_phone: Option<String>,
    pub emergency_contact: Option<String>,
    pub admission_date: String,
    pub academic_year: String,
}
