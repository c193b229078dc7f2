// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含页面模型、仓库与缓存接口以及抓取存储服务
pub mod domain;

/// 引擎模块
///
/// HTTP抓取引擎与URL安全校验
pub mod engines;

/// 基础设施模块
///
/// 提供缓存和仓库的内存实现
pub mod infrastructure;

/// 队列模块
///
/// 待抓取队列与已访问集合
pub mod queue;

/// 爬虫模块
///
/// 有界并发的爬虫工作池
pub mod spider;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;

pub use engines::validators::{Rejection, UrlPolicy, UrlValidator};
pub use spider::{CrawlSummary, Document, DocumentHandler, Spider, SpiderConfig, SpiderError};
