use super::SeaOrmStorage;
use crate::entity::audit_logs::{ActiveModel, Column, Entity as AuditLogs};
use crate::entity::users::Entity as Users;
use crate::errors::{Result, SchoolSystemError};
use crate::models::admin::entities::{AuditLog, NewAuditLog};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, QuerySelect, Set};

impl SeaOrmStorage {
    pub async fn create_audit_log_impl(&self, log: NewAuditLog) -> Result<()> {
        let model = ActiveModel {
            user_id: Set(log.user_id),
            action: Set(log.action),
            entity_type: Set(log.entity_type),
            entity_id: Set(log.entity_id),
            old_values: Set(log.old_values.map(|v| v.to_string())),
            new_values: Set(log.new_values.map(|v| v.to_string())),
            ip_address: Set(log.ip_address),
            user_agent: Set(log.user_agent),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("写入审计日志失败: {e}")))?;

        Ok(())
    }

    /// 最近的审计日志，用户不存在时显示为 System
    pub async fn list_audit_logs_impl(&self, limit: u64) -> Result<Vec<AuditLog>> {
        let rows = AuditLogs::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .find_also_related(Users)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询审计日志失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(log, user)| log.into_audit_log(user))
            .collect())
    }
}
