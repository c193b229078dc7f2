// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::page::Page;
pub use crate::utils::errors::RepositoryError;
use async_trait::async_trait;
use std::sync::Arc;

/// 页面仓库特质
///
/// 定义页面数据访问接口
#[async_trait]
pub trait PageRepository: Send + Sync {
    /// 保存页面，同一URL再次保存时覆盖旧记录
    async fn save(&self, page: &Page) -> Result<(), RepositoryError>;

    /// 根据URL查找页面
    async fn find_by_url(&self, url: &str) -> Result<Option<Page>, RepositoryError>;

    /// 页面总数
    async fn count(&self) -> Result<u64, RepositoryError>;

    /// 最近保存的页面，按保存时间倒序
    async fn recent(&self, limit: usize) -> Result<Vec<Page>, RepositoryError>;
}

#[async_trait]
impl<T: PageRepository + ?Sized> PageRepository for Arc<T> {
    async fn save(&self, page: &Page) -> Result<(), RepositoryError> {
        (**self).save(page).await
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Page>, RepositoryError> {
        (**self).find_by_url(url).await
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        (**self).count().await
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Page>, RepositoryError> {
        (**self).recent(limit).await
    }
}
