// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::{EngineError, FetchEngine, FetchResponse};
use crate::engines::validators::{self, HostResolver, Rejection, SystemResolver};
use async_trait::async_trait;
use reqwest::dns::{Addrs, Name, Resolve, Resolving};
use reqwest::redirect;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;
use url::Url;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 重定向跳数上限
pub const MAX_REDIRECTS: usize = 10;

/// 抓取引擎
///
/// 基于reqwest实现的HTTP抓取引擎，客户端在构造时创建并在所有请求间共享
#[derive(Debug, Clone)]
pub struct ReqwestEngine {
    client: reqwest::Client,
}

impl ReqwestEngine {
    /// 创建抓取引擎
    ///
    /// 连接前的DNS解析使用系统解析器，并对每个解析出的地址做安全分类
    ///
    /// # 参数
    ///
    /// * `user_agent` - 每个请求携带的User-Agent
    /// * `timeout` - 单个请求的整体超时时间
    ///
    /// # 返回值
    ///
    /// * `Ok(ReqwestEngine)` - 抓取引擎
    /// * `Err(EngineError)` - 客户端构建失败
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, EngineError> {
        Self::with_resolver(user_agent, timeout, SystemResolver)
    }

    /// 使用自定义解析器创建抓取引擎
    pub fn with_resolver<R>(
        user_agent: &str,
        timeout: Duration,
        resolver: R,
    ) -> Result<Self, EngineError>
    where
        R: HostResolver + 'static,
    {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .redirect(redirect_policy())
            .dns_resolver(Arc::new(GuardedResolver::new(resolver)))
            .build()?;

        Ok(Self { client })
    }
}

/// 每一跳重定向都重新检查协议、本地主机别名和IP字面量
///
/// 主机名形式的目标在建立连接时由 `GuardedResolver` 检查
fn redirect_policy() -> redirect::Policy {
    redirect::Policy::custom(|attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.stop();
        }
        match validators::check_literal_host(attempt.url()) {
            Ok(()) => attempt.follow(),
            Err(rejection) => {
                warn!(
                    target_url = %attempt.url(),
                    reason = rejection.kind(),
                    "Redirect blocked by URL policy"
                );
                attempt.stop()
            }
        }
    })
}

/// 带地址分类的DNS解析器
///
/// 客户端的每一次连接（包括重定向后的连接）都经过它解析主机名，
/// 只要有一个解析结果是危险地址就拒绝连接。实际连接的地址即为被检查的地址
pub(crate) struct GuardedResolver<R> {
    resolver: Arc<R>,
}

impl<R: HostResolver> GuardedResolver<R> {
    pub(crate) fn new(resolver: R) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }
}

impl<R: HostResolver + 'static> Resolve for GuardedResolver<R> {
    fn resolve(&self, name: Name) -> Resolving {
        let resolver = self.resolver.clone();
        Box::pin(async move {
            let host = name.as_str();
            let ips = HostResolver::resolve(resolver.as_ref(), host, 0)
                .await
                .map_err(|e| Rejection::DnsResolution {
                    host: host.to_string(),
                    reason: e.to_string(),
                })?;
            if ips.is_empty() {
                return Err(Rejection::DnsResolution {
                    host: host.to_string(),
                    reason: "no addresses returned".to_string(),
                }
                .into());
            }

            for ip in &ips {
                if let Err(rejection) = validators::classify_ip(*ip) {
                    warn!(
                        host = host,
                        reason = rejection.kind(),
                        "Connection blocked by URL policy"
                    );
                    return Err(rejection.into());
                }
            }

            let addrs: Addrs = Box::new(ips.into_iter().map(|ip| SocketAddr::new(ip, 0)));
            Ok::<Addrs, BoxError>(addrs)
        })
    }
}

#[async_trait]
impl FetchEngine for ReqwestEngine {
    /// 执行HTTP GET抓取
    ///
    /// 非2xx响应不读取响应体
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, EngineError> {
        let start = Instant::now();
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_error)?;

        let final_url = response.url().clone();
        let status_code = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.trim().is_empty())
            .unwrap_or("text/html")
            .to_string();

        let content = if response.status().is_success() {
            response.text().await.map_err(map_error)?
        } else {
            String::new()
        };

        Ok(FetchResponse {
            url: final_url,
            status_code,
            content,
            content_type,
            response_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

fn map_error(e: reqwest::Error) -> EngineError {
    if e.is_timeout() {
        EngineError::Timeout
    } else {
        EngineError::RequestFailed(e)
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
