//! 成绩实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grades")]
pub struct Model {
    #[sea_orm(primary_key)]
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
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id",
        on_delete = "Cascade"
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
    pub fn into_grade(
        self,
        subject: Option<super::subjects::Model>,
    ) -> crate::models::academic::entities::Grade {
        use crate::models::academic::entities::Grade;
        use chrono::{DateTime, Utc};

        Grade {
            id: self.id,
            student_id: self.student_id,
            subject_id: self.subject_id,
            exam_type: self.exam_type,
            exam_name: self.exam_name,
            max_marks: self.max_marks,
            marks_obtained: self.marks_obtained,
            grade: self.grade,
            remarks: self.remarks,
            graded_by: self.graded_by,
            exam_date: self.exam_date,
            academic_year: self.academic_year,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            subject_name: subject.map(|s| s.name),
        }
    }
}
