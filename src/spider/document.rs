// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl_task::CrawlTask;
use crate::engines::traits::FetchResponse;
use crate::queue::{VisitedSet, WorkQueue};
use crate::utils::{links, url_utils};
use scraper::Html;
use std::sync::Arc;
use tracing::trace;
use url::Url;

/// 待抓取边界：文档处理器向其中追加新URL
#[derive(Debug, Clone)]
pub(crate) struct Frontier {
    pub(crate) queue: Arc<WorkQueue>,
    pub(crate) visited: Arc<VisitedSet>,
    pub(crate) max_depth: u32,
}

impl Frontier {
    fn follow(&self, parent: &CrawlTask, url: &str) -> bool {
        if parent.depth >= self.max_depth {
            trace!(url = url, depth = parent.depth, "Depth limit reached, not following");
            return false;
        }
        if self.visited.contains(url) {
            return false;
        }
        self.queue.push_task(parent.child(url));
        true
    }
}

/// 文档处理器看到的已解析页面
///
/// 只在处理器调用期间有效
pub struct Document<'a> {
    task: &'a CrawlTask,
    response: &'a FetchResponse,
    html: &'a Html,
    frontier: &'a Frontier,
}

impl<'a> Document<'a> {
    pub(crate) fn new(
        task: &'a CrawlTask,
        response: &'a FetchResponse,
        html: &'a Html,
        frontier: &'a Frontier,
    ) -> Self {
        Self {
            task,
            response,
            html,
            frontier,
        }
    }

    /// 解析后的DOM
    pub fn html(&self) -> &Html {
        self.html
    }

    /// 出队时的URL
    pub fn url(&self) -> &str {
        &self.task.url
    }

    /// 跟随重定向后的最终URL，相对链接基于它解析
    pub fn final_url(&self) -> &Url {
        &self.response.url
    }

    /// 距种子URL的深度
    pub fn depth(&self) -> u32 {
        self.task.depth
    }

    pub fn status(&self) -> u16 {
        self.response.status_code
    }

    pub fn content_type(&self) -> &str {
        &self.response.content_type
    }

    /// 原始响应体
    pub fn body(&self) -> &str {
        &self.response.content
    }

    /// 提取匹配选择器的 `href` 原始值
    pub fn extract_links(&self, selector: &str) -> Vec<String> {
        links::extract_links(self.html, selector)
    }

    /// 基于最终URL解析链接，无法解析时返回None
    pub fn resolve(&self, href: &str) -> Option<Url> {
        url_utils::resolve_against(&self.response.url, href).ok()
    }

    /// 将URL加入待抓取队列，深度为当前深度加一
    ///
    /// 超出最大深度或URL已访问时不入队并返回false
    pub fn follow(&self, url: impl AsRef<str>) -> bool {
        self.frontier.follow(self.task, url.as_ref())
    }
}
