mod store;

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FeedError;
#[cfg(test)]
pub use crate::cache::store::MemoryStore;
pub use crate::cache::store::{FileStore, KvStore};
use crate::youtube::VideoRecord;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub records: Vec<VideoRecord>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub captured_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_valid(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        self.captured_at
            .checked_add_signed(ttl)
            .is_none_or(|expires_at| now < expires_at)
    }
}

/// 带过期时间的视频缓存，过期条目在读取时惰性删除
///
/// 缓存只是优化，存储层的任何错误都只记录日志，不会影响调用方
pub struct VideoCache {
    store: Arc<dyn KvStore>,
    ttl: TimeDelta,
}

impl VideoCache {
    pub fn new(store: Arc<dyn KvStore>, ttl_secs: u64) -> Self {
        Self {
            store,
            ttl: i64::try_from(ttl_secs)
                .ok()
                .and_then(TimeDelta::try_seconds)
                .unwrap_or(TimeDelta::MAX),
        }
    }

    pub async fn get(&self, key: &str) -> Option<Vec<VideoRecord>> {
        self.get_at(key, Utc::now()).await
    }

    pub async fn put(&self, key: &str, records: &[VideoRecord]) {
        self.put_at(key, records, Utc::now()).await
    }

    pub async fn clear(&self, key: &str) {
        if let Err(e) = self.store.remove(key).await {
            warn!("{}", FeedError::Cache(format!("{e:#}")));
        }
    }

    pub(crate) async fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<Vec<VideoRecord>> {
        let raw = match self.store.get(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("{}", FeedError::Cache(format!("{e:#}")));
                return None;
            }
        };
        match serde_json::from_str::<CacheEntry>(&raw) {
            Ok(entry) if entry.records.is_empty() => {
                debug!("缓存 {key} 中没有视频，删除");
                self.clear(key).await;
                None
            }
            Ok(entry) if entry.is_valid(now, self.ttl) => {
                debug!("命中缓存 {key}，共 {} 个视频", entry.records.len());
                Some(entry.records)
            }
            Ok(_) => {
                debug!("缓存 {key} 已过期，删除");
                self.clear(key).await;
                None
            }
            Err(e) => {
                warn!("缓存 {key} 内容无法解析：{e}，删除");
                self.clear(key).await;
                None
            }
        }
    }

    pub(crate) async fn put_at(&self, key: &str, records: &[VideoRecord], now: DateTime<Utc>) {
        let entry = CacheEntry {
            records: records.to_vec(),
            captured_at: now,
        };
        let res = match serde_json::to_string(&entry) {
            Ok(raw) => self.store.set(key, &raw).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = res {
            warn!("{}，本次结果不会被缓存", FeedError::Cache(format!("{e:#}")));
        }
    }
}
