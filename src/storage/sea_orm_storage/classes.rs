use super::SeaOrmStorage;
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::errors::{Result, SchoolSystemError};
use crate::models::classes::{entities::Class, requests::CreateClassRequest};
use crate::utils::current_academic_year;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建班级，未指定学年时使用当前学年
    pub async fn create_class_impl(&self, req: CreateClassRequest) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            grade: Set(req.grade),
            section: Set(req.section),
            academic_year: Set(req
                .academic_year
                .filter(|y| !y.trim().is_empty())
                .unwrap_or_else(current_academic_year)),
            total_students: Set(0),
            room_number: Set(req.room_number),
            class_teacher_id: Set(req.class_teacher_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("创建班级失败: {e}")))?;

        Ok(result.into_class())
    }

    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 某学年的班级，按年级、班别排序
    pub async fn list_classes_impl(&self, academic_year: &str) -> Result<Vec<Class>> {
        let rows = Classes::find()
            .filter(Column::AcademicYear.eq(academic_year))
            .order_by_asc(Column::Grade)
            .order_by_asc(Column::Section)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_class()).collect())
    }

    pub async fn count_classes_impl(&self) -> Result<u64> {
        Classes::find()
            .count(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("统计班级数量失败: {e}")))
    }
}
