// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{engine, start_test_site, AllowLocal, TEST_USER_AGENT};
use scraper::Selector;
use spiderrs::spider::{Document, FailureKind, Spider, SpiderConfig, SpiderError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn local_spider(config: SpiderConfig) -> Spider {
    Spider::from_parts(config, engine(), Arc::new(AllowLocal))
}

#[tokio::test]
async fn test_crawl_single_page_end_to_end() {
    let site = start_test_site().await;
    let found = Arc::new(AtomicBool::new(false));

    let mut spider = local_spider(SpiderConfig::default());
    let flag = found.clone();
    spider.on_document(move |document: &Document<'_>| {
        let selector = Selector::parse("h1").unwrap();
        let heading: String = document
            .html()
            .select(&selector)
            .flat_map(|h| h.text())
            .collect();
        if heading == "Test" {
            flag.store(true, Ordering::SeqCst);
        }
        Ok(())
    });
    spider.add_start_url(site.url("/"));

    let summary = spider.run().await.unwrap();

    assert!(found.load(Ordering::SeqCst));
    assert_eq!(spider.visited_count(), 1);
    assert!(summary.is_clean());
    assert_eq!(site.hits(), 1);
}

#[tokio::test]
async fn test_follow_links_on_local_site() {
    let site = start_test_site().await;

    let mut spider = local_spider(SpiderConfig::default().with_concurrency(2));
    spider.on_document(|document: &Document<'_>| {
        for href in document.extract_links("a[href]") {
            if let Some(mut url) = document.resolve(&href) {
                if url.scheme() == "http" {
                    url.set_fragment(None);
                    document.follow(url.as_str());
                }
            }
        }
        Ok(())
    });
    spider.add_start_url(site.url("/index"));

    let summary = spider.run().await.unwrap();

    assert_eq!(summary.succeeded, 3);
    assert!(summary.is_clean());
    assert_eq!(spider.visited_count(), 3);
    assert_eq!(site.hits(), 3);
}

#[tokio::test]
async fn test_run_rejected_while_slow_crawl_in_progress() {
    let site = start_test_site().await;
    let spider = Arc::new(local_spider(SpiderConfig::default()));
    spider.add_start_url(site.url("/slow"));

    let running = spider.clone();
    let handle = tokio::spawn(async move { running.run().await });
    while !spider.is_running() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let second = spider.run().await;
    assert!(matches!(second, Err(SpiderError::AlreadyRunning)));
    assert_eq!(
        second.unwrap_err().to_string(),
        "spider is already running"
    );

    let summary = handle.await.unwrap().unwrap();
    assert_eq!(summary.succeeded, 1);
}

#[tokio::test]
async fn test_user_agent_and_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .and(header("user-agent", TEST_USER_AGENT))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string("<html><body>ok</body></html>"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let spider = local_spider(SpiderConfig::default());
    spider.add_start_urls([
        format!("{}/ok", server.uri()),
        format!("{}/broken", server.uri()),
    ]);

    let summary = spider.run().await.unwrap();

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].kind, FailureKind::Status);
    assert_eq!(summary.failures[0].status, Some(500));
}

#[tokio::test]
async fn test_default_validator_blocks_loopback_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let spider = Spider::new(SpiderConfig::default()).unwrap();
    spider.add_start_url(format!("{}/internal", server.uri()));

    let summary = spider.run().await.unwrap();

    assert_eq!(summary.failures_of(FailureKind::Rejected), 1);
    assert_eq!(summary.failures[0].reason, Some("localhost"));
}
