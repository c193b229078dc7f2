// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 超时
    #[error("Timeout")]
    Timeout,
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

impl EngineError {
    /// 错误分类标识，用于日志和汇总
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::RequestFailed(e) if e.is_connect() => "connect",
            EngineError::RequestFailed(e) if e.is_redirect() => "redirect",
            EngineError::RequestFailed(_) => "request",
            EngineError::Timeout => "timeout",
            EngineError::Other(_) => "other",
        }
    }
}

/// 抓取响应
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// 跟随重定向后的最终URL
    pub url: Url,
    /// HTTP状态码
    pub status_code: u16,
    /// 响应内容，非2xx响应时为空
    pub content: String,
    /// 内容类型
    pub content_type: String,
    /// 响应时间（毫秒）
    pub response_time_ms: u64,
}

impl FetchResponse {
    /// 是否为2xx响应
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// 抓取引擎特质
///
/// 每次调用只发起一次GET请求，不做重试
#[async_trait]
pub trait FetchEngine: Send + Sync {
    /// 执行抓取
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, EngineError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}

#[async_trait]
impl<T: FetchEngine + ?Sized> FetchEngine for Arc<T> {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, EngineError> {
        (**self).fetch(url).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
