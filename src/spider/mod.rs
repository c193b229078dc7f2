// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 爬虫模块
///
/// 有界并发的爬虫工作池及其配置、文档视图和运行汇总
pub mod config;
pub mod document;
pub mod error;
#[allow(clippy::module_inception)]
pub mod spider;
pub mod summary;

pub use config::SpiderConfig;
pub use document::Document;
pub use error::{CrawlError, SpiderError};
pub use spider::{DocumentHandler, Spider};
pub use summary::{CrawlSummary, FailureKind, UrlFailure};
