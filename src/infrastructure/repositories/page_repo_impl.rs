// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::page::Page;
use crate::domain::repositories::page_repository::{PageRepository, RepositoryError};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// 带保存序号的页面记录
struct StoredPage {
    sequence: u64,
    page: Page,
}

/// 内存页面仓库实现
///
/// 以URL为键，保存序号用于按时间倒序列出最近页面
#[derive(Default)]
pub struct InMemoryPageRepository {
    pages: DashMap<String, StoredPage>,
    sequence: AtomicU64,
}

impl InMemoryPageRepository {
    /// 创建新的内存页面仓库实例
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PageRepository for InMemoryPageRepository {
    async fn save(&self, page: &Page) -> Result<(), RepositoryError> {
        if page.url.is_empty() {
            return Err(RepositoryError::InvalidParameter(
                "page url cannot be empty".to_string(),
            ));
        }

        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        self.pages.insert(
            page.url.clone(),
            StoredPage {
                sequence,
                page: page.clone(),
            },
        );
        Ok(())
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Page>, RepositoryError> {
        Ok(self.pages.get(url).map(|stored| stored.page.clone()))
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.pages.len() as u64)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Page>, RepositoryError> {
        let mut pages: Vec<(u64, Page)> = self
            .pages
            .iter()
            .map(|entry| (entry.sequence, entry.page.clone()))
            .collect();
        pages.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(pages
            .into_iter()
            .take(limit)
            .map(|(_, page)| page)
            .collect())
    }
}
