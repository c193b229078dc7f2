// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::num::NonZeroU32;
use std::time::Duration;

/// 默认最大抓取深度
pub const DEFAULT_MAX_DEPTH: u32 = 3;
/// 默认并发数
pub const DEFAULT_CONCURRENCY: usize = 5;
/// 默认User-Agent
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; spiderrs/1.0)";
/// 默认请求超时
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// 爬虫配置
///
/// 工作池构建后不可变。零值字段在构建时替换为默认值
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpiderConfig {
    /// 最大链接深度，种子URL为0
    pub max_depth: u32,
    /// 同时处理的URL上限
    pub concurrency: usize,
    /// 请求携带的User-Agent
    pub user_agent: String,
    /// 每个请求完成后工作者的等待时间
    pub delay: Duration,
    /// 单个请求的整体超时
    pub timeout: Duration,
    /// 全局每秒请求数上限，None表示不限速
    pub requests_per_second: Option<NonZeroU32>,
}

impl Default for SpiderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            concurrency: DEFAULT_CONCURRENCY,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            delay: Duration::ZERO,
            timeout: DEFAULT_TIMEOUT,
            requests_per_second: None,
        }
    }
}

impl SpiderConfig {
    /// 将零值字段替换为默认值
    pub fn normalized(mut self) -> Self {
        if self.max_depth == 0 {
            self.max_depth = DEFAULT_MAX_DEPTH;
        }
        if self.concurrency == 0 {
            self.concurrency = DEFAULT_CONCURRENCY;
        }
        if self.user_agent.trim().is_empty() {
            self.user_agent = DEFAULT_USER_AGENT.to_string();
        }
        if self.timeout.is_zero() {
            self.timeout = DEFAULT_TIMEOUT;
        }
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_requests_per_second(mut self, rps: Option<NonZeroU32>) -> Self {
        self.requests_per_second = rps;
        self
    }
}
