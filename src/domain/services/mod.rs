// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// - 抓取服务（crawl_service）：抓取单个页面、缓存并持久化
pub mod crawl_service;
