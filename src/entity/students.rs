//! 学生档案实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    #[sea_orm(unique)]
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
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id",
        on_delete = "SetNull"
    )]
    Class,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_student(
        self,
        user: Option<super::users::Model>,
    ) -> crate::models::students::entities::Student {
        use crate::models::students::entities::Student;
        use chrono::{DateTime, Utc};

        let (full_name, email) = match user {
            Some(u) => (Some(u.full_name), Some(u.email)),
            None => (None, None),
        };

        Student {
            id: self.id,
            user_id: self.user_id,
            admission_number: self.admission_number,
            roll_number: self.roll_number,
            class_id: self.class_id,
            section: self.section,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            blood_group: self.blood_group,
            address: self.address,
            parent_name: self.parent_name,
            parent_email: self.parent_email,
            parent_phone: self.parent_phone,
            emergency_contact: self.emergency_contact,
            admission_date: self.admission_date,
            academic_year: self.academic_year,
            is_active: self.is_active,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
            full_name,
            email,
            class_name: None,
        }
    }
}
