use std::collections::HashMap;

use super::{SeaOrmStorage, encode_json_list};
use crate::entity::fee_items::{self, Entity as FeeItems};
use crate::entity::fee_structures::{self, Entity as FeeStructures};
use crate::entity::payments::{self, Entity as Payments};
use crate::entity::student_fees::{self, Entity as StudentFees};
use crate::entity::students::{self, Entity as Students};
use crate::entity::users::{self, Entity as Users};
use crate::errors::{Result, SchoolSystemError};
use crate::models::fees::{
    entities::{FeeStructure, Payment, StudentFee},
    requests::{CreateFeeStructureRequest, NewPayment},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use tracing::info;

impl SeaOrmStorage {
    /// 某学年的收费方案及其项目
    pub async fn list_fee_structures_impl(&self, academic_year: &str) -> Result<Vec<FeeStructure>> {
        let rows = FeeStructures::find()
            .filter(fee_structures::Column::AcademicYear.eq(academic_year))
            .order_by_asc(fee_structures::Column::Name)
            .find_with_related(FeeItems)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询收费方案失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(structure, items)| structure.into_fee_structure(items))
            .collect())
    }

    /// 创建收费方案和项目，同一事务
    pub async fn create_fee_structure_impl(
        &self,
        req: CreateFeeStructureRequest,
        academic_year: &str,
    ) -> Result<FeeStructure> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let structure = fee_structures::ActiveModel {
            name: Set(req.name),
            description: Set(req.description),
            applicable_grades: Set(encode_json_list(&req.applicable_grades)),
            academic_year: Set(academic_year.to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| SchoolSystemError::database_operation(format!("创建收费方案失败: {e}")))?;

        let mut items = Vec::with_capacity(req.items.len());
        for item in req.items {
            let created = fee_items::ActiveModel {
                fee_structure_id: Set(structure.id),
                name: Set(item.name),
                amount: Set(item.amount),
                frequency: Set(item.frequency),
                is_optional: Set(item.is_optional),
                due_day: Set(item.due_day),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("创建收费项目失败: {e}")))?;
            items.push(created);
        }

        txn.commit()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(structure.into_fee_structure(items))
    }

    /// 记录缴费。关联了应缴费用时，在同一事务中累加已缴金额并更新状态
    pub async fn record_payment_impl(&self, req: NewPayment) -> Result<Payment> {
        if req.amount.is_nan() || req.amount <= 0.0 {
            return Err(SchoolSystemError::validation("缴费金额必须大于 0"));
        }

        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let fee = match req.student_fee_id {
            Some(fee_id) => {
                let fee = StudentFees::find_by_id(fee_id)
                    .one(&txn)
                    .await
                    .map_err(|e| {
                        SchoolSystemError::database_operation(format!("查询应缴费用失败: {e}"))
                    })?
                    .ok_or_else(|| SchoolSystemError::not_found(format!("应缴费用不存在: {fee_id}")))?;
                if fee.student_id != req.student_id {
                    return Err(SchoolSystemError::validation(format!(
                        "应缴费用 {fee_id} 不属于学生 {}",
                        req.student_id
                    )));
                }
                Some(fee)
            }
            None => None,
        };

        let payment = payments::ActiveModel {
            student_id: Set(req.student_id),
            student_fee_id: Set(req.student_fee_id),
            amount: Set(req.amount),
            payment_method: Set(req.payment_method.to_string()),
            transaction_id: Set(req.transaction_id),
            receipt_number: Set(req.receipt_number),
            payment_date: Set(now),
            status: Set("completed".to_string()),
            notes: Set(req.notes),
            collected_by: Set(Some(req.collected_by)),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| SchoolSystemError::database_operation(format!("写入缴费记录失败: {e}")))?;

        if let Some(fee) = fee {
            let mut settled = fee.clone().into_student_fee();
            settled.apply_payment(req.amount);

            let mut active: student_fees::ActiveModel = fee.into();
            active.paid_amount = Set(settled.paid_amount);
            active.status = Set(settled.status.to_string());
            active.updated_at = Set(now);
            active.update(&txn).await.map_err(|e| {
                SchoolSystemError::database_operation(format!("更新应缴费用失败: {e}"))
            })?;
        }

        txn.commit()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("提交事务失败: {e}")))?;

        info!(
            "Recorded payment {} of {:.2} for student {}",
            payment.receipt_number, payment.amount, payment.student_id
        );
        Ok(payment.into_payment(None))
    }

    /// 最近的缴费记录，附带学生姓名
    pub async fn list_payments_impl(&self, limit: u64) -> Result<Vec<Payment>> {
        let rows = Payments::find()
            .order_by_desc(payments::Column::PaymentDate)
            .order_by_desc(payments::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询缴费记录失败: {e}")))?;

        let student_ids: Vec<i64> = rows.iter().map(|p| p.student_id).collect();
        let names = self.student_names(&student_ids).await?;

        Ok(rows
            .into_iter()
            .map(|p| {
                let name = names.get(&p.student_id).cloned();
                p.into_payment(name)
            })
            .collect())
    }

    pub async fn list_student_fees_impl(&self) -> Result<Vec<StudentFee>> {
        let rows = StudentFees::find()
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询应缴费用失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_student_fee()).collect())
    }

    /// 学生 ID -> 姓名
    async fn student_names(&self, ids: &[i64]) -> Result<HashMap<i64, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = Students::find()
            .filter(students::Column::Id.is_in(ids.to_vec()))
            .find_also_related(Users)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(student, user): (students::Model, Option<users::Model>)| {
                user.map(|u| (student.id, u.full_name))
            })
            .collect())
    }
}
