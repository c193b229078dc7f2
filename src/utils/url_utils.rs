// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{ParseError, Url};

/// 将可能为相对路径的URL转换为绝对路径URL
///
/// `relative` 为绝对URL时忽略 `base`；任一参数格式错误时返回错误
pub fn resolve_url(base: &str, relative: &str) -> Result<String, ParseError> {
    let base = Url::parse(base)?;
    Ok(resolve_against(&base, relative)?.into())
}

/// 基于已解析的基准URL解析相对路径
pub fn resolve_against(base: &Url, path: &str) -> Result<Url, ParseError> {
    base.join(path)
}

/// 两个URL是否属于同一主机
pub fn same_host(a: &Url, b: &Url) -> bool {
    match (a.host_str(), b.host_str()) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_page() {
        assert_eq!(
            resolve_url("https://example.com/base/", "page.html").unwrap(),
            "https://example.com/base/page.html"
        );
    }

    #[test]
    fn test_resolve_root_relative_url() {
        assert_eq!(
            resolve_url("https://example.com/base/", "/absolute/path").unwrap(),
            "https://example.com/absolute/path"
        );
    }

    #[test]
    fn test_resolve_absolute_url() {
        assert_eq!(
            resolve_url("https://example.com/", "https://other.com/page").unwrap(),
            "https://other.com/page"
        );
    }

    #[test]
    fn test_resolve_invalid_base() {
        assert!(resolve_url("://invalid", "/page").is_err());
    }

    #[test]
    fn test_resolve_protocol_relative_url() {
        let base = Url::parse("https://example.com/a/b").unwrap();
        assert_eq!(
            resolve_against(&base, "//t.co/c").unwrap().as_str(),
            "https://t.co/c"
        );
    }

    #[test]
    fn test_resolve_sibling_url() {
        let base = Url::parse("http://example.com/a/b").unwrap();
        assert_eq!(
            resolve_against(&base, "c").unwrap().as_str(),
            "http://example.com/a/c"
        );
    }

    #[test]
    fn test_same_host() {
        let a = Url::parse("https://Example.com/a").unwrap();
        let b = Url::parse("http://example.com/b").unwrap();
        let c = Url::parse("https://other.com/").unwrap();
        assert!(same_host(&a, &b));
        assert!(!same_host(&a, &c));
    }
}
