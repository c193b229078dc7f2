// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// - 抓取任务（crawl_task）：待访问的URL及其深度
/// - 页面（page）：抓取成功后持久化的页面
pub mod crawl_task;
pub mod page;
