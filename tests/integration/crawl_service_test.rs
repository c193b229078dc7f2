// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{engine, start_test_site, AllowLocal};
use spiderrs::domain::repositories::page_repository::PageRepository;
use spiderrs::domain::services::crawl_service::{CrawlService, ServiceError, DEFAULT_CACHE_TTL};
use spiderrs::infrastructure::cache::LruPageCache;
use spiderrs::infrastructure::repositories::InMemoryPageRepository;
use spiderrs::spider::SpiderConfig;
use std::sync::Arc;

#[tokio::test]
async fn test_crawl_service_stores_then_serves_cached_page() {
    let site = start_test_site().await;
    let repo = Arc::new(InMemoryPageRepository::new());
    let service = CrawlService::new(
        repo.clone(),
        engine(),
        Arc::new(AllowLocal),
        SpiderConfig::default(),
    )
    .with_cache(Arc::new(LruPageCache::new(16).unwrap()), DEFAULT_CACHE_TTL);

    let url = site.url("/index");
    let first = service.crawl_and_store(&url).await.unwrap();
    assert!(!first.is_cached());
    assert_eq!(first.page().title, "Index");
    assert_eq!(first.page().domain, "127.0.0.1");

    let second = service.crawl_and_store(&url).await.unwrap();
    assert!(second.is_cached());
    assert_eq!(site.hits(), 1);

    let stored = repo.find_by_url(&url).await.unwrap().unwrap();
    assert_eq!(stored.title, "Index");

    let stats = service.stats().await.unwrap();
    assert_eq!(stats.total_pages, 1);
    assert_eq!(stats.cached_pages, 1);
}

#[tokio::test]
async fn test_crawl_service_reports_missing_page() {
    let site = start_test_site().await;
    let service = CrawlService::new(
        Arc::new(InMemoryPageRepository::new()),
        engine(),
        Arc::new(AllowLocal),
        SpiderConfig::default(),
    );

    let result = service.crawl_and_store(&site.url("/does-not-exist")).await;

    match result {
        Err(ServiceError::Crawl(failure)) => assert_eq!(failure.status, Some(404)),
        other => panic!("expected 404 failure, got {:?}", other),
    }
    assert!(service.recent_pages(10).await.unwrap().is_empty());
}
