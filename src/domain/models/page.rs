// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::spider::Document;
use chrono::{DateTime, Utc};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

/// 无标题页面使用的默认标题
pub const DEFAULT_TITLE: &str = "No title";

/// 页面实体
///
/// 一次成功抓取的结果，可被缓存和持久化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 请求的URL
    pub url: String,
    /// 页面标题，缺失时为 "No title"
    pub title: String,
    /// 最终URL的主机名
    pub domain: String,
    /// HTTP响应状态码
    pub status_code: u16,
    /// 内容类型
    pub content_type: String,
    /// 原始HTML
    pub html: String,
    /// 抓取时间
    pub fetched_at: DateTime<Utc>,
}

impl Page {
    /// 从已解析的文档构建页面
    pub fn from_document(document: &Document<'_>) -> Self {
        Self {
            url: document.url().to_string(),
            title: extract_title(document.html()),
            domain: document.final_url().host_str().unwrap_or_default().to_string(),
            status_code: document.status(),
            content_type: document.content_type().to_string(),
            html: document.body().to_string(),
            fetched_at: Utc::now(),
        }
    }
}

/// 提取 `<title>` 文本，空白或缺失时返回默认标题
pub fn extract_title(html: &Html) -> String {
    let title = Selector::parse("title")
        .ok()
        .and_then(|selector| {
            html.select(&selector)
                .next()
                .map(|element| element.text().collect::<String>())
        })
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();

    if title.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title() {
        let html = Html::parse_document(
            "<html><head><title>\n  Example   Domain \n</title></head><body></body></html>",
        );
        assert_eq!(extract_title(&html), "Example Domain");
    }

    #[test]
    fn test_extract_title_fallback() {
        let html = Html::parse_document("<html><body><h1>Test</h1></body></html>");
        assert_eq!(extract_title(&html), DEFAULT_TITLE);

        let html = Html::parse_document("<html><head><title>   </title></head></html>");
        assert_eq!(extract_title(&html), DEFAULT_TITLE);
    }
}
