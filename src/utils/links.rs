// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::{Html, Selector};
use tracing::warn;

/// 提取匹配选择器的元素的 `href` 属性
///
/// 按文档顺序返回原始值，不去重，不解析为绝对URL。
/// 没有 `href` 的元素被跳过，选择器无效时返回空列表
pub fn extract_links(document: &Html, selector: &str) -> Vec<String> {
    let selector = match Selector::parse(selector) {
        Ok(selector) => selector,
        Err(e) => {
            warn!(selector = selector, error = %e, "Invalid link selector");
            return Vec::new();
        }
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
            <nav><a href="/home">Home</a></nav>
            <a href="page.html">Page</a>
            <a>No href</a>
            <a class="ext" href="https://other.com/x">Other</a>
            <a href="/home">Home again</a>
            <link rel="stylesheet" href="/style.css">
        </body></html>
    "#;

    #[test]
    fn test_extract_links_in_document_order() {
        let html = Html::parse_document(PAGE);
        let links = extract_links(&html, "a[href]");
        assert_eq!(
            links,
            vec!["/home", "page.html", "https://other.com/x", "/home"]
        );
    }

    #[test]
    fn test_elements_without_href_are_skipped() {
        let html = Html::parse_document(PAGE);
        assert_eq!(extract_links(&html, "a").len(), 4);
    }

    #[test]
    fn test_selector_scoping() {
        let html = Html::parse_document(PAGE);
        assert_eq!(extract_links(&html, "a.ext"), vec!["https://other.com/x"]);
        assert_eq!(extract_links(&html, "link"), vec!["/style.css"]);
        assert!(extract_links(&html, "img").is_empty());
    }

    #[test]
    fn test_invalid_selector_returns_empty() {
        let html = Html::parse_document(PAGE);
        assert!(extract_links(&html, "a[[").is_empty());
    }
}
