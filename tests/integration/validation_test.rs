// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use spiderrs::engines::validators::{Rejection, UrlValidator};
use spiderrs::utils::url_utils::resolve_url;

#[tokio::test]
async fn test_system_resolver_rejects_without_network() {
    let validator = UrlValidator::new();

    assert_eq!(
        validator.validate("http://127.0.0.1:8080/api").await,
        Err(Rejection::Localhost("127.0.0.1".to_string()))
    );
    assert_eq!(
        validator.validate("http://10.0.0.1/internal").await,
        Err(Rejection::Private("10.0.0.1".parse().unwrap()))
    );
    assert_eq!(
        validator.validate("file:///etc/passwd").await,
        Err(Rejection::DisallowedScheme("file".to_string()))
    );
    assert_eq!(
        validator.validate("javascript:alert(1)").await,
        Err(Rejection::DisallowedScheme("javascript".to_string()))
    );
    assert_eq!(validator.validate("").await, Err(Rejection::EmptyUrl));
}

#[test]
fn test_resolve_url_literals() {
    assert_eq!(
        resolve_url("https://example.com/base/", "page.html").unwrap(),
        "https://example.com/base/page.html"
    );
    assert_eq!(
        resolve_url("https://example.com/base/", "/absolute/path").unwrap(),
        "https://example.com/absolute/path"
    );
    assert_eq!(
        resolve_url("https://example.com/", "https://other.com/page").unwrap(),
        "https://other.com/page"
    );
    assert!(resolve_url("://invalid", "/page").is_err());
}
