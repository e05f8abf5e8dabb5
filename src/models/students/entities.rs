use serde::{Deserialize, Serialize};

// 学生档案
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub user_id: i64,
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
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    // 关联信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}
