//! 学生应缴费用实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "student_fees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub fee_item_id: i64,
    pub amount: f64,
    pub due_date: String,
    pub status: String,
    pub paid_amount: f64,
    pub waiver_amount: f64,
    pub waiver_reason: Option<String>,
    pub academic_year: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_student_fee(self) -> crate::models::fees::entities::StudentFee {
        use crate::models::fees::entities::{FeeStatus, StudentFee};
        use chrono::{DateTime, Utc};

        StudentFee {
            id: self.id,
            student_id: self.student_id,
            fee_item_id: self.fee_item_id,
            amount: self.amount,
            due_date: self.due_date,
            status: self.status.parse::<FeeStatus>().unwrap_or(FeeStatus::Pending),
            paid_amount: self.paid_amount,
            waiver_amount: self.waiver_amount,
            waiver_reason: self.waiver_reason,
            academic_year: self.academic_year,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
