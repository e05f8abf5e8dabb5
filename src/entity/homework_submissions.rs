//! 作业提交实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "homework_submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub homework_id: i64,
    pub student_id: i64,
    pub submission_text: Option<String>,
    pub attachments: Option<String>,
    pub submitted_at: i64,
    pub marks_obtained: Option<f64>,
    pub feedback: Option<String>,
    pub graded_by: Option<i64>,
    pub graded_at: Option<i64>,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::homework::Entity",
        from = "Column::HomeworkId",
        to = "super::homework::Column::Id",
        on_delete = "Cascade"
    )]
    Homework,
}

impl Related<super::homework::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Homework.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_submission(self) -> crate::models::academic::entities::HomeworkSubmission {
        use crate::models::academic::entities::HomeworkSubmission;
        use chrono::{DateTime, Utc};

        HomeworkSubmission {
            id: self.id,
            homework_id: self.homework_id,
            student_id: self.student_id,
            submission_text: self.submission_text,
            attachments: self
                .attachments
                .and_then(|s| serde_json::from_str(&s).ok())
                .unwrap_or_default(),
            submitted_at: DateTime::<Utc>::from_timestamp(self.submitted_at, 0)
                .unwrap_or_default(),
            marks_obtained: self.marks_obtained,
            feedback: self.feedback,
            graded_by: self.graded_by,
            graded_at: self
                .graded_at
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
            status: self.status,
        }
    }
}
