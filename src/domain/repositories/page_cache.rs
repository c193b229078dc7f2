// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::page::Page;
pub use crate::utils::errors::CacheError;
use async_trait::async_trait;
use std::time::Duration;

/// 页面缓存键
pub fn page_key(url: &str) -> String {
    format!("page:{}", url)
}

/// 页面缓存特质
///
/// 过期条目对所有读取操作都不可见
#[async_trait]
pub trait PageCache: Send + Sync {
    /// 读取未过期的页面
    async fn get(&self, key: &str) -> Result<Option<Page>, CacheError>;

    /// 写入页面并设置存活时间
    async fn put(&self, key: &str, page: Page, ttl: Duration) -> Result<(), CacheError>;

    /// 是否存在未过期的条目
    async fn contains(&self, key: &str) -> Result<bool, CacheError>;

    /// 删除条目，返回条目是否存在
    async fn remove(&self, key: &str) -> Result<bool, CacheError>;

    /// 清空缓存
    async fn clear(&self) -> Result<(), CacheError>;

    /// 当前条目数（可能包含尚未清理的过期条目）
    async fn len(&self) -> Result<usize, CacheError>;
}
