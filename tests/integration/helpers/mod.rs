// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use axum::{extract::State, response::Html, routing::get, Router};
use spiderrs::engines::reqwest_engine::ReqwestEngine;
use spiderrs::engines::validators::{Rejection, UrlPolicy, ValidationVerdict};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use url::Url;

pub const TEST_USER_AGENT: &str = "spiderrs-it/1.0";

/// 允许本地测试服务器的策略，只校验URL格式和协议
pub struct AllowLocal;

#[async_trait]
impl UrlPolicy for AllowLocal {
    async fn validate(&self, raw_url: &str) -> ValidationVerdict {
        let url = Url::parse(raw_url).map_err(|e| Rejection::Malformed(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(Rejection::DisallowedScheme(other.to_string())),
        }
    }
}

pub fn engine() -> Arc<ReqwestEngine> {
    Arc::new(ReqwestEngine::new(TEST_USER_AGENT, Duration::from_secs(5)).unwrap())
}

/// 本地测试站点，统计请求次数
#[allow(dead_code)]
pub struct TestSite {
    pub base_url: String,
    pub hits: Arc<AtomicUsize>,
}

impl TestSite {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn page(State(hits): State<Arc<AtomicUsize>>, body: &'static str) -> Html<&'static str> {
    hits.fetch_add(1, Ordering::SeqCst);
    Html(body)
}

pub async fn start_test_site() -> TestSite {
    let hits = Arc::new(AtomicUsize::new(0));

    let app = Router::new()
        .route(
            "/",
            get(|state: State<Arc<AtomicUsize>>| {
                page(state, "<html><body><h1>Test</h1></body></html>")
            }),
        )
        .route(
            "/index",
            get(|state: State<Arc<AtomicUsize>>| {
                page(
                    state,
                    r#"<html><head><title>Index</title></head><body>
                        <a href="/a">A</a>
                        <a href="b">B</a>
                        <a href="/a#top">A again</a>
                        <a href="mailto:team@example.com">Mail</a>
                    </body></html>"#,
                )
            }),
        )
        .route(
            "/a",
            get(|state: State<Arc<AtomicUsize>>| {
                page(state, r#"<html><body><a href="/index">Back</a></body></html>"#)
            }),
        )
        .route(
            "/b",
            get(|state: State<Arc<AtomicUsize>>| {
                page(state, r#"<html><body><a href="/a">A</a></body></html>"#)
            }),
        )
        .route(
            "/slow",
            get(|state: State<Arc<AtomicUsize>>| async move {
                tokio::time::sleep(Duration::from_millis(500)).await;
                page(state, "<html><body>slow</body></html>").await
            }),
        )
        .with_state(hits.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestSite {
        base_url: format!("http://{}", addr),
        hits,
    }
}
