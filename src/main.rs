// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Context;
use clap::{Parser, Subcommand};
use spiderrs::config::settings::Settings;
use spiderrs::engines::validators::UrlValidator;
use spiderrs::spider::{Document, Spider};
use spiderrs::utils::{telemetry, url_utils};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use url::Url;
use validator::Validate;

#[derive(Parser, Debug)]
#[command(
    name = "spiderrs",
    version,
    about = "Bounded concurrent web spider with SSRF-safe URL validation"
)]
struct Cli {
    /// 配置文件路径，缺省时加载 config/default 和环境变量
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 从种子URL开始抓取并输出JSON汇总
    Crawl {
        #[arg(required = true)]
        urls: Vec<String>,

        /// 覆盖最大深度
        #[arg(long)]
        depth: Option<u32>,

        /// 覆盖并发数
        #[arg(long)]
        concurrency: Option<usize>,

        /// 选取待跟随链接的CSS选择器
        #[arg(long, default_value = "a[href]")]
        selector: String,

        /// 只跟随与种子URL同主机的链接
        #[arg(long)]
        same_domain: bool,
    },

    /// 检查URL是否允许抓取
    Validate { url: String },
}

/// 主函数
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Settings::new().context("Failed to load configuration")?,
    };
    settings.validate().context("Invalid configuration")?;

    telemetry::init_telemetry_with(&settings.telemetry.filter, settings.telemetry.json);

    match cli.command {
        Commands::Crawl {
            urls,
            depth,
            concurrency,
            selector,
            same_domain,
        } => {
            let mut config = settings.spider.to_spider_config();
            if let Some(depth) = depth {
                config.max_depth = depth;
            }
            if let Some(concurrency) = concurrency {
                config.concurrency = concurrency;
            }
            crawl(config, urls, selector, same_domain).await
        }
        Commands::Validate { url } => validate(&url).await,
    }
}

async fn crawl(
    config: spiderrs::SpiderConfig,
    urls: Vec<String>,
    selector: String,
    same_domain: bool,
) -> anyhow::Result<()> {
    let seeds: Arc<Vec<Url>> = Arc::new(urls.iter().filter_map(|u| Url::parse(u).ok()).collect());

    let mut spider = Spider::new(config)?;
    spider.on_document(move |document: &Document<'_>| {
        for href in document.extract_links(&selector) {
            let Some(mut url) = document.resolve(&href) else {
                continue;
            };
            if !matches!(url.scheme(), "http" | "https") {
                continue;
            }
            if same_domain && !seeds.iter().any(|seed| url_utils::same_host(seed, &url)) {
                continue;
            }
            url.set_fragment(None);
            document.follow(url.as_str());
        }
        Ok(())
    });
    spider.add_start_urls(urls);

    let spider = Arc::new(spider);
    let stopper = spider.clone();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received, finishing in-flight pages");
                stopper.stop();
            }
            Err(err) => error!("Unable to listen for shutdown signal: {}", err),
        }
    });

    let summary = spider.run().await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn validate(url: &str) -> anyhow::Result<()> {
    match UrlValidator::new().validate(url).await {
        Ok(url) => {
            println!("allowed: {}", url);
            Ok(())
        }
        Err(rejection) => anyhow::bail!("rejected ({}): {}", rejection.kind(), rejection),
    }
}
