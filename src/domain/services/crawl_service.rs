// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::CacheSettings;
use crate::domain::models::page::Page;
use crate::domain::repositories::page_cache::{page_key, CacheError, PageCache};
use crate::domain::repositories::page_repository::{PageRepository, RepositoryError};
use crate::engines::reqwest_engine::ReqwestEngine;
use crate::engines::traits::{EngineError, FetchEngine};
use crate::engines::validators::{UrlPolicy, UrlValidator};
use crate::infrastructure::cache::LruPageCache;
use crate::spider::{Document, Spider, SpiderConfig, SpiderError, UrlFailure};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// 页面缓存默认存活时间
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// 抓取服务错误类型
#[derive(Error, Debug)]
pub enum ServiceError {
    /// 抓取失败（拒绝、网络错误、非2xx或处理失败）
    #[error("Crawl failed for {}: {}", .0.url, .0.message)]
    Crawl(UrlFailure),
    /// 工作者panic
    #[error("Crawl worker panicked for {0}")]
    Panicked(String),
    /// 没有得到页面
    #[error("No page captured for {0}")]
    NoPage(String),
    /// 爬虫使用错误
    #[error("Spider error: {0}")]
    Spider(#[from] SpiderError),
    /// 引擎构建失败
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
    /// 仓库错误
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
    /// 缓存错误
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

/// 抓取结果来源
#[derive(Debug, Clone)]
pub enum CrawlOutcome {
    /// 命中缓存，未发起请求
    Cached(Page),
    /// 新抓取并已保存
    Stored(Page),
}

impl CrawlOutcome {
    pub fn page(&self) -> &Page {
        match self {
            CrawlOutcome::Cached(page) | CrawlOutcome::Stored(page) => page,
        }
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, CrawlOutcome::Cached(_))
    }
}

/// 抓取统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    /// 仓库中的页面总数
    pub total_pages: u64,
    /// 是否启用缓存
    pub cache_enabled: bool,
    /// 缓存中的页面数
    pub cached_pages: usize,
}

/// 抓取服务
///
/// 抓取单个页面，保存到仓库并写入缓存
pub struct CrawlService<R: PageRepository> {
    /// 页面仓库
    repo: Arc<R>,
    /// 页面缓存
    cache: Option<Arc<dyn PageCache>>,
    /// 抓取引擎
    engine: Arc<dyn FetchEngine>,
    /// URL准入策略
    policy: Arc<dyn UrlPolicy>,
    /// 爬虫配置
    config: SpiderConfig,
    /// 缓存存活时间
    cache_ttl: Duration,
}

impl<R: PageRepository> CrawlService<R> {
    /// 创建新的抓取服务实例，默认不启用缓存
    ///
    /// # 参数
    ///
    /// * `repo` - 页面仓库
    /// * `engine` - 抓取引擎
    /// * `policy` - URL准入策略
    /// * `config` - 爬虫配置
    pub fn new(
        repo: Arc<R>,
        engine: Arc<dyn FetchEngine>,
        policy: Arc<dyn UrlPolicy>,
        config: SpiderConfig,
    ) -> Self {
        Self {
            repo,
            cache: None,
            engine,
            policy,
            config: config.normalized(),
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// 使用reqwest引擎、系统DNS校验器和配置中的LRU缓存创建服务
    pub fn from_settings(
        repo: Arc<R>,
        config: SpiderConfig,
        cache: &CacheSettings,
    ) -> Result<Self, ServiceError> {
        let config = config.normalized();
        let engine = ReqwestEngine::new(&config.user_agent, config.timeout)?;
        let service = Self::new(
            repo,
            Arc::new(engine),
            Arc::new(UrlValidator::new()),
            config,
        );

        if cache.enabled {
            let lru = LruPageCache::new(cache.capacity)?;
            info!(
                capacity = lru.capacity(),
                ttl_secs = cache.ttl_secs,
                "Page cache enabled"
            );
            Ok(service.with_cache(Arc::new(lru), cache.ttl()))
        } else {
            Ok(service)
        }
    }

    /// 启用页面缓存
    pub fn with_cache(mut self, cache: Arc<dyn PageCache>, ttl: Duration) -> Self {
        self.cache = Some(cache);
        self.cache_ttl = ttl;
        self
    }

    /// 抓取并存储页面
    ///
    /// 缓存命中时直接返回缓存页面；否则抓取、保存到仓库并写入缓存。
    /// 缓存读写失败只记录警告
    ///
    /// # 返回值
    ///
    /// * `Ok(CrawlOutcome)` - 页面及其来源
    /// * `Err(ServiceError)` - 抓取或保存失败
    pub async fn crawl_and_store(&self, url: &str) -> Result<CrawlOutcome, ServiceError> {
        let key = page_key(url);

        if let Some(cache) = &self.cache {
            match cache.get(&key).await {
                Ok(Some(page)) => {
                    debug!(url = url, "Page served from cache");
                    return Ok(CrawlOutcome::Cached(page));
                }
                Ok(None) => {}
                Err(e) => warn!(url = url, error = %e, "Page cache read failed"),
            }
        }

        let page = self.crawl_page(url).await?;
        self.repo.save(&page).await?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(&key, page.clone(), self.cache_ttl).await {
                warn!(url = url, error = %e, "Failed to cache page");
            }
        }

        info!(url = url, title = %page.title, "Page crawled and stored");
        Ok(CrawlOutcome::Stored(page))
    }

    /// 获取抓取统计
    pub async fn stats(&self) -> Result<CrawlStats, ServiceError> {
        let total_pages = self.repo.count().await?;
        let cached_pages = match &self.cache {
            Some(cache) => cache.len().await.unwrap_or_else(|e| {
                warn!(error = %e, "Failed to read page cache size");
                0
            }),
            None => 0,
        };

        Ok(CrawlStats {
            total_pages,
            cache_enabled: self.cache.is_some(),
            cached_pages,
        })
    }

    /// 最近保存的页面
    pub async fn recent_pages(&self, limit: usize) -> Result<Vec<Page>, ServiceError> {
        Ok(self.repo.recent(limit).await?)
    }

    /// 对单个URL执行一次爬虫运行并捕获页面
    async fn crawl_page(&self, url: &str) -> Result<Page, ServiceError> {
        let captured: Arc<Mutex<Option<Page>>> = Arc::new(Mutex::new(None));
        let sink = captured.clone();

        let mut spider = Spider::from_parts(
            self.config.clone().with_concurrency(1),
            self.engine.clone(),
            self.policy.clone(),
        );
        spider.on_document(move |document: &Document<'_>| {
            *sink.lock() = Some(Page::from_document(document));
            Ok(())
        });
        spider.add_start_url(url);

        let mut summary = spider.run().await?;
        if let Some(failure) = summary.failures.pop() {
            return Err(ServiceError::Crawl(failure));
        }
        if summary.panicked > 0 {
            return Err(ServiceError::Panicked(url.to_string()));
        }

        let page = captured.lock().take();
        page.ok_or_else(|| ServiceError::NoPage(url.to_string()))
    }
}

#[cfg(test)]
#[path = "crawl_service_test.rs"]
mod tests;
