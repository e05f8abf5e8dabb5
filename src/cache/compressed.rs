//! Snappy 压缩的对象缓存
//!
//! 写入：JSON 序列化 → Snappy 压缩 → 按调用方给定的 TTL 写入后端；
//! 读取：取出 → 解压 → 反序列化。本层不做任何淘汰策略，过期交给后端。

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::warn;

use crate::cache::{CacheResult, ObjectCache};
use crate::errors::Result;

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub items: Option<u64>,
}

#[derive(Clone)]
pub struct CompressedCache {
    inner: Arc<dyn ObjectCache>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl CompressedCache {
    pub fn new(inner: Arc<dyn ObjectCache>) -> Self {
        Self {
            inner,
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn store<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<()> {
        let json = serde_json::to_vec(value)?;
        let compressed = snap::raw::Encoder::new().compress_vec(&json)?;
        // 后端以秒为单位，不足一秒按一秒处理
        let ttl_secs = ttl.as_secs().max(1);
        self.inner
            .insert_raw(key.to_string(), compressed, ttl_secs)
            .await;
        Ok(())
    }

    /// 未命中返回 Ok(None)；数据损坏时删除该键并返回错误
    pub async fn fetch<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let bytes = match self.inner.get_raw(key).await {
            CacheResult::Found(bytes) => bytes,
            CacheResult::NotFound | CacheResult::ExistsButNoValue => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                return Ok(None);
            }
        };

        let decoded: Result<T> = snap::raw::Decoder::new()
            .decompress_vec(&bytes)
            .map_err(Into::into)
            .and_then(|json| serde_json::from_slice::<T>(&json).map_err(Into::into));

        match decoded {
            Ok(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(value))
            }
            Err(e) => {
                warn!("Dropping undecodable cache entry '{}': {}", key, e);
                self.misses.fetch_add(1, Ordering::Relaxed);
                self.inner.remove(key).await;
                Err(e)
            }
        }
    }

    pub async fn remove(&self, key: &str) {
        self.inner.remove(key).await;
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            items: self.inner.entry_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        message: String,
        values: Vec<i64>,
    }

    fn cache() -> (Arc<MokaCacheWrapper>, CompressedCache) {
        let backend = Arc::new(MokaCacheWrapper::with_capacity(100, 60));
        let wrapper = CompressedCache::new(backend.clone());
        (backend, wrapper)
    }

    #[tokio::test]
    async fn test_store_then_fetch() {
        let (backend, cache) = cache();
        let value = Sample {
            message: "hello ".repeat(50),
            values: vec![1, 2, 3],
        };
        cache
            .store("sample", &value, Duration::from_secs(60))
            .await
            .unwrap();

        // 后端中保存的是压缩后的字节，而不是 JSON 文本
        let CacheResult::Found(raw) = backend.get_raw("sample").await else {
            panic!("entry missing");
        };
        assert!(raw.len() < serde_json::to_vec(&value).unwrap().len());

        let fetched: Option<Sample> = cache.fetch("sample").await.unwrap();
        assert_eq!(fetched, Some(value));
        assert_eq!(cache.stats().hits, 1);
    }

    #[tokio::test]
    async fn test_miss_counts() {
        let (_, cache) = cache();
        let fetched: Option<Sample> = cache.fetch("absent").await.unwrap();
        assert!(fetched.is_none());
        assert_eq!(cache.stats().misses, 1);
    }

    #[tokio::test]
    async fn test_corrupt_entry_removed() {
        let (backend, cache) = cache();
        backend
            .insert_raw("bad".into(), b"not snappy".to_vec(), 60)
            .await;
        assert!(cache.fetch::<Sample>("bad").await.is_err());
        assert_eq!(backend.get_raw("bad").await, CacheResult::NotFound);
    }
}
