// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use dashmap::DashSet;

/// 已访问URL集合
///
/// 基于分段锁的并发集合，同一会话内每个URL只能被认领一次
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: DashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 尝试认领URL
    ///
    /// 检查与插入在同一个临界区内完成
    ///
    /// # 返回值
    ///
    /// 首次认领返回true，已被认领返回false
    pub fn try_claim(&self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    /// 归还尚未处理的认领
    pub(crate) fn release(&self, url: &str) {
        self.urls.remove(url);
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// 清空集合，开始新的会话
    pub fn clear(&self) {
        self.urls.clear();
    }

    /// 已认领的URL数量
    pub fn count(&self) -> usize {
        self.urls.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_claim_once() {
        let visited = VisitedSet::new();

        assert!(visited.try_claim("https://example.com/"));
        assert!(!visited.try_claim("https://example.com/"));
        assert!(visited.contains("https://example.com/"));
        assert_eq!(visited.count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_claims_succeed_exactly_once() {
        let visited = Arc::new(VisitedSet::new());
        let winners = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::new();

        for _ in 0..64 {
            let visited = visited.clone();
            let winners = winners.clone();
            handles.push(tokio::spawn(async move {
                if visited.try_claim("https://example.com/contended") {
                    winners.fetch_add(1, Ordering::SeqCst);
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(winners.load(Ordering::SeqCst), 1);
        assert_eq!(visited.count(), 1);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let visited = VisitedSet::new();
        visited.try_claim("https://example.com/a");
        visited.try_claim("https://example.com/b");

        visited.clear();
        visited.clear();

        assert_eq!(visited.count(), 0);
        assert!(visited.try_claim("https://example.com/a"));
    }

    #[test]
    fn test_release_allows_reclaim() {
        let visited = VisitedSet::new();
        visited.try_claim("https://example.com/a");
        visited.release("https://example.com/a");

        assert!(!visited.contains("https://example.com/a"));
        assert!(visited.try_claim("https://example.com/a"));
    }
}
