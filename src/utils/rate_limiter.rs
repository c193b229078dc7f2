// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;

/// 全局请求限速器
///
/// 令牌桶，所有工作者共享
pub struct RequestRateLimiter {
    limiter: DefaultDirectRateLimiter,
    requests_per_second: NonZeroU32,
}

impl RequestRateLimiter {
    /// 创建每秒允许 `requests_per_second` 个请求的限速器
    pub fn per_second(requests_per_second: NonZeroU32) -> Self {
        Self {
            limiter: RateLimiter::direct(Quota::per_second(requests_per_second)),
            requests_per_second,
        }
    }

    /// 等待直到可以发出下一个请求
    pub async fn until_ready(&self) {
        self.limiter.until_ready().await;
    }

    #[cfg(test)]
    fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }

    pub fn requests_per_second(&self) -> NonZeroU32 {
        self.requests_per_second
    }
}

impl std::fmt::Debug for RequestRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestRateLimiter")
            .field("requests_per_second", &self.requests_per_second)
            .finish()
    }
}
