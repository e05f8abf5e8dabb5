use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端出错，按未命中处理
    ExistsButNoValue,
}

/// 字节级对象缓存后端
#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<Vec<u8>>;
    /// `ttl` 单位为秒，0 表示使用后端默认值
    async fn insert_raw(&self, key: String, value: Vec<u8>, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);

    /// 当前条目数，后端无法统计时返回 None
    fn entry_count(&self) -> Option<u64> {
        None
    }
}
