// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl_task::CrawlTask;
use crate::engines::reqwest_engine::ReqwestEngine;
use crate::engines::traits::{FetchEngine, FetchResponse};
use crate::engines::validators::{UrlPolicy, UrlValidator};
use crate::queue::{VisitedSet, WorkQueue};
use crate::spider::config::SpiderConfig;
use crate::spider::document::{Document, Frontier};
use crate::spider::error::{CrawlError, SpiderError};
use crate::spider::summary::CrawlSummary;
use crate::utils::rate_limiter::RequestRateLimiter;
use metrics::{counter, gauge};
use parking_lot::Mutex;
use scraper::Html;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument, Span};
use uuid::Uuid;

/// 文档处理器
///
/// 每个成功抓取并解析的页面调用一次。处理器同步执行，
/// 返回的错误只影响当前URL
pub trait DocumentHandler: Send + Sync {
    fn handle(&self, document: &Document<'_>) -> anyhow::Result<()>;
}

impl<F> DocumentHandler for F
where
    F: Fn(&Document<'_>) -> anyhow::Result<()> + Send + Sync,
{
    fn handle(&self, document: &Document<'_>) -> anyhow::Result<()> {
        self(document)
    }
}

/// 一次运行使用的取消令牌
///
/// `shutdown` 是 `cancel` 的子令牌，强制取消同时停止派发
#[derive(Clone)]
struct RunTokens {
    cancel: CancellationToken,
    shutdown: CancellationToken,
}

impl RunTokens {
    fn new() -> Self {
        let cancel = CancellationToken::new();
        let shutdown = cancel.child_token();
        Self { cancel, shutdown }
    }
}

/// 运行结束时复位运行标志
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// 有界并发爬虫
///
/// 从FIFO队列取出URL，经已访问集合去重后在信号量限制下派发给工作者。
/// 每个工作者依次执行：安全校验、GET请求、状态检查、HTML解析、处理器回调、延迟
pub struct Spider {
    config: Arc<SpiderConfig>,
    engine: Arc<dyn FetchEngine>,
    policy: Arc<dyn UrlPolicy>,
    handler: Option<Arc<dyn DocumentHandler>>,
    limiter: Option<Arc<RequestRateLimiter>>,
    queue: Arc<WorkQueue>,
    visited: Arc<VisitedSet>,
    running: AtomicBool,
    tokens: Mutex<RunTokens>,
    span: Span,
}

impl Spider {
    /// 创建使用reqwest引擎和系统DNS校验器的爬虫
    ///
    /// HTTP客户端在此处创建一次，所有工作者共享
    pub fn new(config: SpiderConfig) -> Result<Self, SpiderError> {
        let config = config.normalized();
        let engine = ReqwestEngine::new(&config.user_agent, config.timeout)?;
        Ok(Self::from_parts(
            config,
            Arc::new(engine),
            Arc::new(UrlValidator::new()),
        ))
    }

    /// 使用自定义抓取引擎和URL策略创建爬虫
    pub fn from_parts(
        config: SpiderConfig,
        engine: Arc<dyn FetchEngine>,
        policy: Arc<dyn UrlPolicy>,
    ) -> Self {
        let config = config.normalized();
        let limiter = config
            .requests_per_second
            .map(|rps| Arc::new(RequestRateLimiter::per_second(rps)));

        Self {
            config: Arc::new(config),
            engine,
            policy,
            handler: None,
            limiter,
            queue: Arc::new(WorkQueue::new()),
            visited: Arc::new(VisitedSet::new()),
            running: AtomicBool::new(false),
            tokens: Mutex::new(RunTokens::new()),
            span: info_span!("spider"),
        }
    }

    /// 替换URL准入策略
    pub fn with_policy(mut self, policy: impl UrlPolicy + 'static) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// 指定父span，运行和工作者的span都挂在它下面
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// 设置文档处理器
    pub fn with_handler(mut self, handler: impl DocumentHandler + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// 使用闭包设置文档处理器
    pub fn on_document<F>(&mut self, handler: F)
    where
        F: Fn(&Document<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
    }

    pub fn config(&self) -> &SpiderConfig {
        &self.config
    }

    /// 添加种子URL，运行中也可以调用
    pub fn add_start_url(&self, url: impl Into<String>) {
        self.queue.push(url);
    }

    pub fn add_start_urls<I, S>(&self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for url in urls {
            self.queue.push(url);
        }
    }

    /// 队列中等待派发的URL数
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// 本会话已认领的URL数
    pub fn visited_count(&self) -> usize {
        self.visited.count()
    }

    /// 清空已访问集合，开始新的会话
    pub fn clear_visited(&self) {
        self.visited.clear();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// 停止派发新URL，已派发的工作继续完成，队列保持不变
    pub fn stop(&self) {
        if self.is_running() {
            info!(parent: &self.span, "Stop requested");
        }
        self.tokens.lock().shutdown.cancel();
    }

    /// 停止派发并中断进行中的校验、请求和延迟
    pub fn cancel(&self) {
        if self.is_running() {
            warn!(parent: &self.span, "Cancel requested");
        }
        self.tokens.lock().cancel.cancel();
    }

    /// 运行直到队列为空且所有工作者完成
    ///
    /// # 返回值
    ///
    /// * `Ok(CrawlSummary)` - 本次运行的汇总，单个URL的错误记录在其中
    /// * `Err(SpiderError::AlreadyRunning)` - 已有一次运行在进行
    pub async fn run(&self) -> Result<CrawlSummary, SpiderError> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!(parent: &self.span, "Spider is already running");
            return Err(SpiderError::AlreadyRunning);
        }
        let _guard = RunningGuard(&self.running);

        let tokens = {
            let mut tokens = self.tokens.lock();
            *tokens = RunTokens::new();
            tokens.clone()
        };

        let session_id = Uuid::new_v4();
        let span = info_span!(parent: &self.span, "crawl_run", session_id = %session_id);
        Ok(self.drive(tokens, session_id).instrument(span).await)
    }

    async fn drive(&self, tokens: RunTokens, session_id: Uuid) -> CrawlSummary {
        let started = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let mut workers: JoinSet<(String, Result<(), CrawlError>)> = JoinSet::new();
        let mut summary = CrawlSummary::new(session_id);

        info!(
            pending = self.queue.len(),
            concurrency = self.config.concurrency,
            max_depth = self.config.max_depth,
            requests_per_second = self
                .limiter
                .as_ref()
                .map(|l| l.requests_per_second().get()),
            "Crawl started"
        );

        loop {
            while let Some(joined) = workers.try_join_next() {
                record(&mut summary, joined);
            }

            if tokens.shutdown.is_cancelled() {
                summary.stopped = true;
                break;
            }

            let Some(task) = self.queue.pop_front() else {
                if workers.is_empty() {
                    break;
                }
                // Handlers may enqueue more work, re-check the queue after each completion
                tokio::select! {
                    biased;
                    _ = tokens.shutdown.cancelled() => {
                        summary.stopped = true;
                        break;
                    }
                    joined = workers.join_next() => {
                        if let Some(joined) = joined {
                            record(&mut summary, joined);
                        }
                    }
                }
                continue;
            };

            if !self.visited.try_claim(&task.url) {
                debug!(url = %task.url, "Skipping already visited URL");
                counter!("spider_urls_skipped_total").increment(1);
                summary.skipped += 1;
                continue;
            }

            let permit = tokio::select! {
                biased;
                _ = tokens.shutdown.cancelled() => None,
                permit = semaphore.clone().acquire_owned() => permit.ok(),
            };
            let Some(permit) = permit else {
                // Not dispatched, hand the URL back for the next run
                self.visited.release(&task.url);
                self.queue.push_front(task);
                summary.stopped = true;
                break;
            };

            summary.dispatched += 1;
            counter!("spider_urls_dispatched_total").increment(1);

            let worker = self.worker(tokens.cancel.clone());
            let span = info_span!("crawl_url", url = %task.url, depth = task.depth);
            workers.spawn(
                async move {
                    let _permit = permit;
                    worker.process(task).await
                }
                .instrument(span),
            );
        }

        while let Some(joined) = workers.join_next().await {
            record(&mut summary, joined);
        }

        summary.elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            dispatched = summary.dispatched,
            succeeded = summary.succeeded,
            failed = summary.failures.len(),
            skipped = summary.skipped,
            stopped = summary.stopped,
            elapsed_ms = summary.elapsed_ms,
            "Crawl finished"
        );
        summary
    }

    fn worker(&self, cancel: CancellationToken) -> Worker {
        Worker {
            config: self.config.clone(),
            engine: self.engine.clone(),
            policy: self.policy.clone(),
            handler: self.handler.clone(),
            limiter: self.limiter.clone(),
            frontier: Frontier {
                queue: self.queue.clone(),
                visited: self.visited.clone(),
                max_depth: self.config.max_depth,
            },
            cancel,
        }
    }
}

fn record(
    summary: &mut CrawlSummary,
    joined: Result<(String, Result<(), CrawlError>), JoinError>,
) {
    match joined {
        Ok((url, result)) => summary.record(url, result),
        Err(e) => {
            error!(error = %e, "Crawl worker panicked");
            summary.panicked += 1;
        }
    }
}

/// 处理单个URL的工作者
struct Worker {
    config: Arc<SpiderConfig>,
    engine: Arc<dyn FetchEngine>,
    policy: Arc<dyn UrlPolicy>,
    handler: Option<Arc<dyn DocumentHandler>>,
    limiter: Option<Arc<RequestRateLimiter>>,
    frontier: Frontier,
    cancel: CancellationToken,
}

impl Worker {
    async fn process(self, task: CrawlTask) -> (String, Result<(), CrawlError>) {
        let _in_flight = InFlight::enter();
        let result = self.crawl(&task).await;

        match &result {
            Ok(()) => debug!("URL processed"),
            Err(CrawlError::Rejected(rejection)) => {
                counter!("spider_urls_rejected_total", "reason" => rejection.kind()).increment(1);
                warn!(reason = rejection.kind(), error = %rejection, "URL rejected");
            }
            Err(CrawlError::Handler(e)) => {
                counter!("spider_handler_failures_total").increment(1);
                let message = format!("{:#}", e);
                warn!(error = %message, "Document handler failed");
            }
            Err(CrawlError::Cancelled) => debug!("URL cancelled"),
            Err(e) => {
                counter!("spider_fetch_failures_total").increment(1);
                warn!(error = %e, "Fetch failed");
            }
        }

        let request_issued = match &result {
            Ok(()) => true,
            Err(e) => e.request_issued(),
        };
        if request_issued && !self.config.delay.is_zero() {
            tokio::select! {
                _ = self.cancel.cancelled() => {}
                _ = tokio::time::sleep(self.config.delay) => {}
            }
        }

        (task.url, result)
    }

    async fn crawl(&self, task: &CrawlTask) -> Result<(), CrawlError> {
        let url = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(CrawlError::Cancelled),
            verdict = self.policy.validate(&task.url) => verdict?,
        };

        if let Some(limiter) = &self.limiter {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(CrawlError::Cancelled),
                _ = limiter.until_ready() => {}
            }
        }

        let response = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(CrawlError::Cancelled),
            response = self.engine.fetch(&url) => response?,
        };
        counter!("spider_pages_fetched_total").increment(1);
        debug!(
            status = response.status_code,
            response_time_ms = response.response_time_ms,
            "Page fetched"
        );

        self.handle_response(task, &response)
    }

    /// 解析并回调处理器，DOM不跨越await
    fn handle_response(&self, task: &CrawlTask, response: &FetchResponse) -> Result<(), CrawlError> {
        if !response.is_success() {
            return Err(CrawlError::Status(response.status_code));
        }

        let Some(handler) = &self.handler else {
            return Ok(());
        };

        let html = Html::parse_document(&response.content);
        let document = Document::new(task, response, &html, &self.frontier);
        match panic::catch_unwind(AssertUnwindSafe(|| handler.handle(&document))) {
            Ok(result) => result.map_err(CrawlError::Handler),
            Err(payload) => Err(CrawlError::Handler(anyhow::anyhow!(
                "document handler panicked: {}",
                panic_message(payload.as_ref())
            ))),
        }
    }
}

/// 在途工作者计数，离开作用域时（包括panic展开）自动减一
struct InFlight;

impl InFlight {
    fn enter() -> Self {
        gauge!("spider_in_flight").increment(1.0);
        InFlight
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        gauge!("spider_in_flight").decrement(1.0);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

#[cfg(test)]
#[path = "spider_test.rs"]
mod tests;
