use serde::Deserialize;

// 管理员创建教师（用户 + 档案）
#[derive(Debug, Deserialize)]
pub struct CreateTeacherRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub employee_id: String,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub qualifications: Option<String>,
    #[serde(default)]
    pub subjects_taught: Vec<String>,
    #[serde(default)]
    pub experience_years: i32,
    pub joining_date: Option<String>,
}

// 教师档案（存储层）
#[derive(Debug, Clone)]
pub struct NewTeacherProfile {
    pub employee_id: String,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub qualifications: Option<String>,
    pub subjects_taught: Vec<String>,
    pub experience_years: i32,
    pub joining_date: Option<String>,
}
