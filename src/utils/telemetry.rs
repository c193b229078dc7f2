// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 默认日志过滤规则
pub const DEFAULT_FILTER: &str = "info,spiderrs=debug";

pub fn init_telemetry() {
    init_telemetry_with(DEFAULT_FILTER, false);
}

/// 使用给定的回退过滤规则初始化日志，RUST_LOG优先
///
/// `json` 为真时输出带span上下文的JSON行，否则输出人类可读格式
pub fn init_telemetry_with(fallback_filter: &str, json: bool) {
    if let Err(e) = try_init_telemetry(fallback_filter, json) {
        eprintln!("telemetry already initialized: {}", e);
    }
}

/// 初始化日志，全局订阅者已存在时返回错误
pub fn try_init_telemetry(fallback_filter: &str, json: bool) -> Result<(), TryInitError> {
    let registry = tracing_subscriber::registry().with(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback_filter.into()),
    );

    if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    }
}
