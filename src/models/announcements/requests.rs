use serde::Deserialize;

// 公告列表查询
#[derive(Debug, Deserialize)]
pub struct AnnouncementListParams {
    pub limit: Option<u64>,
}

// 发布公告（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct CreateAnnouncementRequest {
    pub title: String,
    pub content: String,
    pub target_type: Option<String>,
    pub target_id: Option<i64>,
    pub priority: Option<String>,
    #[serde(default)]
    pub is_pinned: bool,
    /// RFC3339
    pub expires_at: Option<String>,
}

// 公告写入（存储层）
#[derive(Debug, Clone)]
pub struct NewAnnouncement {
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub target_type: String,
    pub target_id: Option<i64>,
    pub priority: String,
    pub is_pinned: bool,
    pub expires_at: Option<i64>,
}
