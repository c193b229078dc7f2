// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::spider::SpiderConfig;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::num::NonZeroU32;
use std::path::Path;
use std::time::Duration;
use validator::Validate;

/// 环境变量前缀，例如 `SPIDERRS__SPIDER__CONCURRENCY=8`
pub const ENV_PREFIX: &str = "SPIDERRS";

/// 应用程序配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    /// 爬虫配置
    #[validate(nested)]
    pub spider: SpiderSettings,
    /// 页面缓存配置
    #[validate(nested)]
    pub cache: CacheSettings,
    /// 日志配置
    pub telemetry: TelemetrySettings,
}

/// 爬虫配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SpiderSettings {
    /// 请求携带的User-Agent
    #[validate(length(min = 1, message = "user agent cannot be empty"))]
    pub user_agent: String,
    /// 最大链接深度
    #[validate(range(min = 1, max = 10))]
    pub max_depth: u32,
    /// 并发数
    #[validate(range(min = 1, max = 100))]
    pub concurrency: usize,
    /// 请求超时时间（秒）
    #[validate(range(min = 1, max = 300))]
    pub request_timeout_secs: u64,
    /// 请求间隔（毫秒）
    pub delay_ms: u64,
    /// 全局每秒请求数上限，0或缺省表示不限速
    pub requests_per_second: Option<u32>,
}

/// 页面缓存配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CacheSettings {
    /// 是否启用缓存
    pub enabled: bool,
    /// 最大条目数
    #[validate(range(min = 1))]
    pub capacity: usize,
    /// 条目存活时间（秒）
    pub ttl_secs: u64,
}

/// 日志配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    /// 未设置RUST_LOG时使用的过滤规则
    pub filter: String,
    /// 以JSON行格式输出日志
    pub json: bool,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加默认值、`config/default`、`config/{APP_ENVIRONMENT}` 和环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

        builder.build()?.try_deserialize()
    }

    /// 从指定文件加载配置，环境变量仍可覆盖
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = Self::defaults()?
            .add_source(File::from(path.as_ref()).required(true))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

        builder.build()?.try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("spider.user_agent", crate::spider::config::DEFAULT_USER_AGENT)?
            .set_default("spider.max_depth", 3)?
            .set_default("spider.concurrency", 5)?
            .set_default("spider.request_timeout_secs", 30)?
            .set_default("spider.delay_ms", 0)?
            .set_default("cache.enabled", true)?
            .set_default("cache.capacity", 1000)?
            .set_default("cache.ttl_secs", 86_400)?
            .set_default("telemetry.filter", "info,spiderrs=debug")?
            .set_default("telemetry.json", false)
    }
}

impl SpiderSettings {
    /// 转换为爬虫配置
    pub fn to_spider_config(&self) -> SpiderConfig {
        SpiderConfig {
            max_depth: self.max_depth,
            concurrency: self.concurrency,
            user_agent: self.user_agent.clone(),
            delay: Duration::from_millis(self.delay_ms),
            timeout: Duration::from_secs(self.request_timeout_secs),
            requests_per_second: self.requests_per_second.and_then(NonZeroU32::new),
        }
        .normalized()
    }
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
