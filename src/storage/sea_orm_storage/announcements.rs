use super::SeaOrmStorage;
use crate::entity::announcements::{ActiveModel, Column, Entity as Announcements};
use crate::entity::users::Entity as Users;
use crate::errors::{Result, SchoolSystemError};
use crate::models::announcements::{entities::Announcement, requests::NewAnnouncement};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set,
};

impl SeaOrmStorage {
    /// 未过期的公告，置顶优先，其次按发布时间倒序
    pub async fn list_announcements_impl(&self, limit: u64) -> Result<Vec<Announcement>> {
        let now = chrono::Utc::now().timestamp();

        let rows = Announcements::find()
            .filter(
                Condition::any()
                    .add(Column::ExpiresAt.is_null())
                    .add(Column::ExpiresAt.gt(now)),
            )
            .order_by_desc(Column::IsPinned)
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .find_also_related(Users)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询公告失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(announcement, author)| announcement.into_announcement(author))
            .collect())
    }

    pub async fn create_announcement_impl(&self, req: NewAnnouncement) -> Result<Announcement> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            title: Set(req.title),
            content: Set(req.content),
            author_id: Set(req.author_id),
            target_type: Set(req.target_type),
            target_id: Set(req.target_id),
            priority: Set(req.priority),
            is_pinned: Set(req.is_pinned),
            expires_at: Set(req.expires_at),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("发布公告失败: {e}")))?;

        Ok(result.into_announcement(None))
    }
}
