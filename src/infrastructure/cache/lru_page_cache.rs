// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::page::Page;
use crate::domain::repositories::page_cache::{CacheError, PageCache};
use async_trait::async_trait;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// 缓存条目
struct CacheEntry {
    page: Page,
    created_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn new(page: Page, ttl: Duration) -> Self {
        Self {
            page,
            created_at: Instant::now(),
            ttl,
        }
    }

    fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.ttl
    }
}

/// 基于LRU的内存页面缓存
///
/// 超出容量时淘汰最久未使用的条目，过期条目在读取或统计时删除
pub struct LruPageCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
}

impl LruPageCache {
    /// 创建指定容量的缓存
    ///
    /// # 返回值
    ///
    /// * `Ok(LruPageCache)` - 缓存实例
    /// * `Err(CacheError::ZeroCapacity)` - 容量为0
    pub fn new(capacity: usize) -> Result<Self, CacheError> {
        let capacity = NonZeroUsize::new(capacity).ok_or(CacheError::ZeroCapacity)?;
        Ok(Self {
            entries: Mutex::new(LruCache::new(capacity)),
        })
    }

    /// 缓存容量
    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }
}

/// 删除全部过期条目，返回删除数量
fn purge_expired(entries: &mut LruCache<String, CacheEntry>) -> usize {
    let expired: Vec<String> = entries
        .iter()
        .filter(|(_, entry)| entry.is_expired())
        .map(|(key, _)| key.clone())
        .collect();
    for key in &expired {
        entries.pop(key);
    }
    if !expired.is_empty() {
        debug!(count = expired.len(), "Purged expired page cache entries");
    }
    expired.len()
}

#[async_trait]
impl PageCache for LruPageCache {
    async fn get(&self, key: &str) -> Result<Option<Page>, CacheError> {
        let mut entries = self.entries.lock();
        let expired = match entries.get(key) {
            Some(entry) if !entry.is_expired() => return Ok(Some(entry.page.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(key);
        }
        Ok(None)
    }

    async fn put(&self, key: &str, page: Page, ttl: Duration) -> Result<(), CacheError> {
        self.entries
            .lock()
            .put(key.to_string(), CacheEntry::new(page, ttl));
        debug!(key = key, ttl_secs = ttl.as_secs(), "Stored page in cache");
        Ok(())
    }

    async fn contains(&self, key: &str) -> Result<bool, CacheError> {
        let entries = self.entries.lock();
        Ok(entries.peek(key).is_some_and(|entry| !entry.is_expired()))
    }

    async fn remove(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.entries.lock().pop(key).is_some())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.entries.lock().clear();
        Ok(())
    }

    /// 只统计未过期的条目，统计前清理过期条目
    async fn len(&self) -> Result<usize, CacheError> {
        let mut entries = self.entries.lock();
        purge_expired(&mut entries);
        Ok(entries.len())
    }
}
