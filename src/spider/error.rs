// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::EngineError;
use crate::engines::validators::Rejection;
use thiserror::Error;

/// 爬虫工作池错误类型
///
/// 只有使用错误会导致 `run()` 失败，单个URL的错误记录在汇总中
#[derive(Error, Debug)]
pub enum SpiderError {
    /// 工作池已在运行
    #[error("spider is already running")]
    AlreadyRunning,
    /// HTTP客户端构建失败
    #[error("Failed to build fetch engine: {0}")]
    Engine(#[from] EngineError),
}

/// 单个URL的抓取错误
#[derive(Error, Debug)]
pub enum CrawlError {
    /// URL未通过安全校验，未发起请求
    #[error("URL rejected: {0}")]
    Rejected(#[from] Rejection),
    /// 网络或传输错误
    #[error("Fetch failed: {0}")]
    Fetch(#[from] EngineError),
    /// 非2xx响应
    #[error("Unexpected HTTP status {0}")]
    Status(u16),
    /// 文档处理器返回错误
    #[error("Document handler failed: {0:#}")]
    Handler(anyhow::Error),
    /// 被强制取消
    #[error("Crawl cancelled")]
    Cancelled,
}

impl CrawlError {
    /// 是否已经向目标发出了请求
    pub fn request_issued(&self) -> bool {
        matches!(
            self,
            CrawlError::Fetch(_) | CrawlError::Status(_) | CrawlError::Handler(_)
        )
    }
}
