// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 抓取任务
///
/// 待访问的URL，种子URL深度为0
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CrawlTask {
    /// 目标URL
    pub url: String,
    /// 距种子URL的链接跳数
    pub depth: u32,
}

impl CrawlTask {
    /// 创建深度为0的种子任务
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            depth: 0,
        }
    }

    /// 派生下一层的子任务
    pub fn child(&self, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            depth: self.depth.saturating_add(1),
        }
    }
}
