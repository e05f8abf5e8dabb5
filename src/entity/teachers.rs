//! 教师档案实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "teachers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    #[sea_orm(unique)]
    pub employee_id: String,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub qualifications: Option<String>,
    /// JSON 数组
    pub subjects_taught: Option<String>,
    pub experience_years: i32,
    pub joining_date: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::teacher_assignments::Entity")]
    Assignments,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::teacher_assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_teacher(
        self,
        user: Option<super::users::Model>,
    ) -> crate::models::teachers::entities::Teacher {
        use crate::models::teachers::entities::Teacher;
        use chrono::{DateTime, Utc};

        let (full_name, email) = match user {
            Some(u) => (Some(u.full_name), Some(u.email)),
            None => (None, None),
        };

        Teacher {
            id: self.id,
            user_id: self.user_id,
            employee_id: self.employee_id,
            department: self.department,
            designation: self.designation,
            qualifications: self.qualifications,
            subjects_taught: self
                .subjects_taught
                .and_then(|s| serde_json::from_str(&s).ok())
                .unwrap_or_default(),
            experience_years: self.experience_years,
            joining_date: self.joining_date,
            is_active: self.is_active,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
            full_name,
            email,
        }
    }
}
