//! 课表实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "timetables")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_id: i64,
    /// 0 = 周日
    pub day_of_week: i32,
    pub period_number: i32,
    pub subject_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub start_time: String,
    pub end_time: String,
    pub room_number: Option<String>,
    pub academic_year: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id"
    )]
    Subject,
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_entry(
        self,
        subject: Option<super::subjects::Model>,
    ) -> crate::models::academic::entities::TimetableEntry {
        use crate::models::academic::entities::TimetableEntry;

        TimetableEntry {
            id: self.id,
            class_id: self.class_id,
            day_of_week: self.day_of_week,
            period_number: self.period_number,
            subject_id: self.subject_id,
            teacher_id: self.teacher_id,
            start_time: self.start_time,
            end_time: self.end_time,
            room_number: self.room_number,
            academic_year: self.academic_year,
            subject_name: subject.map(|s| s.name),
        }
    }
}
