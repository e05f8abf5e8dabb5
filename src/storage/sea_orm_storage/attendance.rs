use super::SeaOrmStorage;
use crate::entity::attendance::{ActiveModel, Column, Entity as Attendance};
use crate::entity::attendance_sessions::{self, Entity as AttendanceSessions};
use crate::errors::{Result, SchoolSystemError};
use crate::models::attendance::{entities::Attendance as AttendanceView, requests::AttendanceBatch};
use sea_orm::{
    ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::OnConflict,
};
use tracing::debug;

impl SeaOrmStorage {
    /// 点名。带照片时先写入会话，再逐个学生写入记录，全部成功才提交
    pub async fn mark_attendance_impl(&self, batch: AttendanceBatch) -> Result<usize> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("开启事务失败: {e}")))?;

        if let Some(photo_url) = batch.photo_url.as_deref().filter(|url| !url.is_empty()) {
            let session = attendance_sessions::ActiveModel {
                class_id: Set(batch.class_id),
                teacher_id: Set(batch.marked_by),
                date: Set(batch.date.clone()),
                photo_url: Set(Some(photo_url.to_string())),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };

            AttendanceSessions::insert(session)
                .on_conflict(
                    OnConflict::columns([
                        attendance_sessions::Column::ClassId,
                        attendance_sessions::Column::Date,
                    ])
                    .update_columns([
                        attendance_sessions::Column::PhotoUrl,
                        attendance_sessions::Column::TeacherId,
                        attendance_sessions::Column::UpdatedAt,
                    ])
                    .to_owned(),
                )
                .exec_without_returning(&txn)
                .await
                .map_err(|e| {
                    SchoolSystemError::database_operation(format!("写入点名会话失败: {e}"))
                })?;
        }

        let mut written = 0;
        for record in batch.records {
            let model = ActiveModel {
                student_id: Set(record.student_id),
                class_id: Set(batch.class_id),
                date: Set(batch.date.clone()),
                status: Set(record.status.to_string()),
                marked_by: Set(Some(batch.marked_by)),
                remarks: Set(record.remarks),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };

            Attendance::insert(model)
                .on_conflict(
                    OnConflict::columns([Column::StudentId, Column::Date])
                        .update_columns([
                            Column::Status,
                            Column::Remarks,
                            Column::MarkedBy,
                            Column::UpdatedAt,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(&txn)
                .await
                .map_err(|e| {
                    SchoolSystemError::database_operation(format!(
                        "写入学生 {} 的考勤失败: {e}",
                        record.student_id
                    ))
                })?;
            written += 1;
        }

        txn.commit()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("提交事务失败: {e}")))?;

        debug!(
            "Marked attendance for class {} on {}: {} records",
            batch.class_id, batch.date, written
        );
        Ok(written)
    }

    /// 学生最近的考勤记录
    pub async fn list_student_attendance_impl(
        &self,
        student_id: i64,
        limit: u64,
    ) -> Result<Vec<AttendanceView>> {
        let rows = Attendance::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::Date)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询考勤失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_attendance()).collect())
    }

    pub async fn list_student_attendance_between_impl(
        &self,
        student_id: i64,
        from: &str,
        to: &str,
    ) -> Result<Vec<AttendanceView>> {
        let rows = Attendance::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::Date.between(from, to))
            .order_by_desc(Column::Date)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询考勤失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_attendance()).collect())
    }
}
