// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl_task::CrawlTask;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// 待抓取队列
///
/// 先进先出，入队永不阻塞，工作进行中也可以继续增长
#[derive(Debug, Default)]
pub struct WorkQueue {
    tasks: Mutex<VecDeque<CrawlTask>>,
}

impl WorkQueue {
    /// 创建空队列
    pub fn new() -> Self {
        Self::default()
    }

    /// 以深度0入队URL
    pub fn push(&self, url: impl Into<String>) {
        self.push_task(CrawlTask::new(url));
    }

    /// 入队任务
    pub fn push_task(&self, task: CrawlTask) {
        self.tasks.lock().push_back(task);
    }

    /// 将任务放回队首，用于停止时归还尚未派发的任务
    pub fn push_front(&self, task: CrawlTask) {
        self.tasks.lock().push_front(task);
    }

    /// 出队最早入队的任务
    pub fn pop_front(&self) -> Option<CrawlTask> {
        self.tasks.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }

    /// 清空队列
    pub fn clear(&self) {
        self.tasks.lock().clear();
    }
}
