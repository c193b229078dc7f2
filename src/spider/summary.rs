// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::spider::error::CrawlError;
use serde::Serialize;
use uuid::Uuid;

/// 失败类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Rejected,
    Fetch,
    Status,
    Handler,
    Cancelled,
}

/// 单个URL的失败记录
#[derive(Debug, Clone, Serialize)]
pub struct UrlFailure {
    /// 失败的URL
    pub url: String,
    /// 失败类别
    pub kind: FailureKind,
    /// 拒绝原因或传输错误类别
    pub reason: Option<&'static str>,
    /// 非2xx响应的状态码
    pub status: Option<u16>,
    /// 错误描述
    pub message: String,
}

impl UrlFailure {
    pub fn new(url: impl Into<String>, error: &CrawlError) -> Self {
        let (kind, reason, status) = match error {
            CrawlError::Rejected(rejection) => (FailureKind::Rejected, Some(rejection.kind()), None),
            CrawlError::Fetch(e) => (FailureKind::Fetch, Some(e.kind()), None),
            CrawlError::Status(code) => (FailureKind::Status, None, Some(*code)),
            CrawlError::Handler(_) => (FailureKind::Handler, None, None),
            CrawlError::Cancelled => (FailureKind::Cancelled, None, None),
        };
        Self {
            url: url.into(),
            kind,
            reason,
            status,
            message: error.to_string(),
        }
    }
}

/// 一次 `run()` 的汇总
#[derive(Debug, Clone, Serialize)]
pub struct CrawlSummary {
    /// 会话ID，与日志中的 `session_id` 字段一致
    pub session_id: Uuid,
    /// 派发给工作者的URL数
    pub dispatched: usize,
    /// 处理成功的URL数
    pub succeeded: usize,
    /// 因已访问而跳过的队列条目数
    pub skipped: usize,
    /// 发生panic的工作者数
    pub panicked: usize,
    /// 失败记录
    pub failures: Vec<UrlFailure>,
    /// 是否因 `stop()` 或 `cancel()` 提前结束
    pub stopped: bool,
    /// 运行耗时（毫秒）
    pub elapsed_ms: u64,
}

impl CrawlSummary {
    pub(crate) fn new(session_id: Uuid) -> Self {
        Self {
            session_id,
            dispatched: 0,
            succeeded: 0,
            skipped: 0,
            panicked: 0,
            failures: Vec::new(),
            stopped: false,
            elapsed_ms: 0,
        }
    }

    pub(crate) fn record(&mut self, url: String, result: Result<(), CrawlError>) {
        match result {
            Ok(()) => self.succeeded += 1,
            Err(e) => self.failures.push(UrlFailure::new(url, &e)),
        }
    }

    /// 指定类别的失败数
    pub fn failures_of(&self, kind: FailureKind) -> usize {
        self.failures.iter().filter(|f| f.kind == kind).count()
    }

    /// 没有任何失败或panic
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.panicked == 0
    }
}
