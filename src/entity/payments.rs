//! 缴费记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub student_fee_id: Option<i64>,
    pub amount: f64,
    pub payment_method: String,
    pub transaction_id: Option<String>,
    #[sea_orm(unique)]
    pub receipt_number: String,
    pub payment_date: i64,
    pub status: String,
    pub notes: Option<String>,
    pub collected_by: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_payment(
        self,
        student_name: Option<String>,
    ) -> crate::models::fees::entities::Payment {
        use crate::models::fees::entities::Payment;
        use chrono::{DateTime, Utc};

        Payment {
            id: self.id,
            student_id: self.student_id,
            student_fee_id: self.student_fee_id,
            amount: self.amount,
            payment_method: self.payment_method,
            transaction_id: self.transaction_id,
            receipt_number: self.receipt_number,
            payment_date: DateTime::<Utc>::from_timestamp(self.payment_date, 0)
                .unwrap_or_default(),
            status: self.status,
            notes: self.notes,
            collected_by: self.collected_by,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            student_name,
        }
    }
}
