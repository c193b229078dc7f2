// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::io;
use std::net::IpAddr;
use std::sync::Arc;
use thiserror::Error;
use url::{Host, ParseError, Url};

/// 禁止访问的本地主机别名
pub const LOCALHOST_ALIASES: [&str; 5] = ["localhost", "127.0.0.1", "::1", "0.0.0.0", "::"];

/// 允许抓取的URL协议
const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

/// URL拒绝原因
///
/// 每一次拒绝都恰好对应一个原因
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// URL为空
    #[error("URL cannot be empty")]
    EmptyUrl,
    /// URL格式错误
    #[error("Invalid URL format: {0}")]
    Malformed(String),
    /// 协议不被允许
    #[error("Disallowed URL scheme: {0} (only http/https allowed)")]
    DisallowedScheme(String),
    /// 主机名为空
    #[error("Hostname cannot be empty")]
    EmptyHost,
    /// 本地主机
    #[error("Localhost URLs are not allowed: {0}")]
    Localhost(String),
    /// DNS解析失败
    #[error("Cannot resolve hostname {host}: {reason}")]
    DnsResolution { host: String, reason: String },
    /// 解析到环回地址
    #[error("Hostname resolves to loopback address {0}")]
    Loopback(IpAddr),
    /// 解析到私有地址
    #[error("Hostname resolves to private address {0}")]
    Private(IpAddr),
    /// 解析到链路本地地址
    #[error("Hostname resolves to link-local address {0}")]
    LinkLocal(IpAddr),
    /// 解析到组播地址
    #[error("Hostname resolves to multicast address {0}")]
    Multicast(IpAddr),
}

impl Rejection {
    /// 拒绝原因的稳定标识，用于日志和指标标签
    pub fn kind(&self) -> &'static str {
        match self {
            Rejection::EmptyUrl => "empty_url",
            Rejection::Malformed(_) => "malformed",
            Rejection::DisallowedScheme(_) => "disallowed_scheme",
            Rejection::EmptyHost => "empty_host",
            Rejection::Localhost(_) => "localhost",
            Rejection::DnsResolution { .. } => "dns_resolution",
            Rejection::Loopback(_) => "loopback",
            Rejection::Private(_) => "private",
            Rejection::LinkLocal(_) => "link_local",
            Rejection::Multicast(_) => "multicast",
        }
    }
}

/// 校验结果：允许的URL或拒绝原因
pub type ValidationVerdict = Result<Url, Rejection>;

/// 主机名解析器接口
///
/// 抽象DNS查询，便于在测试中替换
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// 解析主机名得到全部IP地址
    async fn resolve(&self, host: &str, port: u16) -> io::Result<Vec<IpAddr>>;
}

/// 基于系统DNS的解析器
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

#[async_trait]
impl HostResolver for SystemResolver {
    async fn resolve(&self, host: &str, port: u16) -> io::Result<Vec<IpAddr>> {
        let addrs = tokio::net::lookup_host((host, port)).await?;
        Ok(addrs.map(|addr| addr.ip()).collect())
    }
}

/// URL准入策略
///
/// 爬虫在发起任何网络请求前都必须经过该策略
#[async_trait]
pub trait UrlPolicy: Send + Sync {
    /// 校验URL
    async fn validate(&self, raw_url: &str) -> ValidationVerdict;
}

#[async_trait]
impl<T: UrlPolicy + ?Sized> UrlPolicy for Arc<T> {
    async fn validate(&self, raw_url: &str) -> ValidationVerdict {
        (**self).validate(raw_url).await
    }
}

/// URL校验器 (防止 SSRF)
///
/// 依次检查协议、主机名和DNS解析后的所有IP地址
#[derive(Debug, Clone, Default)]
pub struct UrlValidator<R: HostResolver = SystemResolver> {
    resolver: R,
}

impl UrlValidator<SystemResolver> {
    /// 使用系统DNS创建校验器
    pub fn new() -> Self {
        Self {
            resolver: SystemResolver,
        }
    }
}

impl<R: HostResolver> UrlValidator<R> {
    /// 使用自定义解析器创建校验器
    pub fn with_resolver(resolver: R) -> Self {
        Self { resolver }
    }

    /// 校验URL是否允许抓取
    ///
    /// # 参数
    ///
    /// * `raw_url` - 原始URL字符串
    ///
    /// # 返回值
    ///
    /// * `Ok(Url)` - 解析后的URL
    /// * `Err(Rejection)` - 拒绝原因
    pub async fn validate(&self, raw_url: &str) -> ValidationVerdict {
        let url = precheck(raw_url)?;

        let ips = match url.host() {
            Some(Host::Ipv4(ip)) => vec![IpAddr::V4(ip)],
            Some(Host::Ipv6(ip)) => vec![IpAddr::V6(ip)],
            Some(Host::Domain(domain)) => {
                let port = url.port_or_known_default().unwrap_or(80);
                let ips = self
                    .resolver
                    .resolve(domain, port)
                    .await
                    .map_err(|e| Rejection::DnsResolution {
                        host: domain.to_string(),
                        reason: e.to_string(),
                    })?;
                if ips.is_empty() {
                    return Err(Rejection::DnsResolution {
                        host: domain.to_string(),
                        reason: "no addresses returned".to_string(),
                    });
                }
                ips
            }
            None => return Err(Rejection::EmptyHost),
        };

        // A single dangerous address is enough to reject the whole URL
        for ip in ips {
            classify_ip(ip)?;
        }

        Ok(url)
    }
}

#[async_trait]
impl<R: HostResolver> UrlPolicy for UrlValidator<R> {
    async fn validate(&self, raw_url: &str) -> ValidationVerdict {
        UrlValidator::validate(self, raw_url).await
    }
}

/// 不依赖DNS的前置检查（空串、格式、协议、主机名、本地主机别名）
pub fn precheck(raw_url: &str) -> ValidationVerdict {
    if raw_url.is_empty() {
        return Err(Rejection::EmptyUrl);
    }

    let url = match Url::parse(raw_url) {
        Ok(url) => url,
        Err(ParseError::EmptyHost) => {
            // Special schemes fail to parse without a host, keep the scheme verdict first
            let scheme = raw_url
                .split_once(':')
                .map(|(scheme, _)| scheme.to_ascii_lowercase())
                .unwrap_or_default();
            if !ALLOWED_SCHEMES.contains(&scheme.as_str()) {
                return Err(Rejection::DisallowedScheme(scheme));
            }
            return Err(Rejection::EmptyHost);
        }
        Err(e) => return Err(Rejection::Malformed(e.to_string())),
    };

    check_scheme_and_host(&url)?;
    Ok(url)
}

/// 同步检查已解析URL的协议和主机，主机为IP字面量时同时检查地址范围
///
/// 用于无法执行DNS查询的场景，例如重定向跟随
pub fn check_literal_host(url: &Url) -> Result<(), Rejection> {
    check_scheme_and_host(url)?;
    match url.host() {
        Some(Host::Ipv4(ip)) => classify_ip(IpAddr::V4(ip)),
        Some(Host::Ipv6(ip)) => classify_ip(IpAddr::V6(ip)),
        _ => Ok(()),
    }
}

fn check_scheme_and_host(url: &Url) -> Result<(), Rejection> {
    let scheme = url.scheme().to_ascii_lowercase();
    if !ALLOWED_SCHEMES.contains(&scheme.as_str()) {
        return Err(Rejection::DisallowedScheme(scheme));
    }

    let hostname = match url.host() {
        Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_ascii_lowercase(),
        Some(Host::Ipv4(ip)) => ip.to_string(),
        Some(Host::Ipv6(ip)) => ip.to_string(),
        _ => return Err(Rejection::EmptyHost),
    };

    if is_localhost(&hostname) {
        return Err(Rejection::Localhost(hostname));
    }

    Ok(())
}

/// 检查主机名是否为本地主机别名
pub fn is_localhost(hostname: &str) -> bool {
    let hostname = hostname.trim_start_matches('[').trim_end_matches(']');
    LOCALHOST_ALIASES
        .iter()
        .any(|alias| alias.eq_ignore_ascii_case(hostname))
}

/// 对单个IP地址分类，危险地址返回对应的拒绝原因
pub fn classify_ip(ip: IpAddr) -> Result<(), Rejection> {
    let canonical = ip.to_canonical();

    if canonical.is_loopback() || canonical.is_unspecified() {
        return Err(Rejection::Loopback(ip));
    }
    if is_private(canonical) {
        return Err(Rejection::Private(ip));
    }
    if is_link_local(canonical) {
        return Err(Rejection::LinkLocal(ip));
    }
    if canonical.is_multicast() {
        return Err(Rejection::Multicast(ip));
    }

    Ok(())
}

fn is_private(ip: IpAddr) -> bool {
    match ip {
        // 10.0.0.0/8, 172.16.0.0/12, 192.168.0.0/16
        IpAddr::V4(ipv4) => ipv4.is_private(),
        // Unique Local Address (fc00::/7)
        IpAddr::V6(ipv6) => (ipv6.segments()[0] & 0xfe00) == 0xfc00,
    }
}

fn is_link_local(ip: IpAddr) -> bool {
    match ip {
        // 169.254.0.0/16
        IpAddr::V4(ipv4) => ipv4.is_link_local(),
        // fe80::/10
        IpAddr::V6(ipv6) => (ipv6.segments()[0] & 0xffc0) == 0xfe80,
    }
}

#[cfg(test)]
#[path = "validators_test.rs"]
mod tests;
