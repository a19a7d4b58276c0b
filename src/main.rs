use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::time::Instant;
use tracing::{error, info};

use baike::browser::BrowserSummaryClient;
use baike::config::{Cli, Command};
use baike::extractor::PageResult;
use baike::search::SearchResult;
use baike::utils::init_logging;
use baike::{BaikeClient, BaikeError, Disambiguation, Lookup};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志系统
    init_logging(cli.verbose, cli.quiet);

    let start = Instant::now();

    if let Err(e) = run(&cli).await {
        match e.downcast_ref::<BaikeError>() {
            Some(BaikeError::PageNotFound { term }) => error!("❌ 词条不存在: {}", term),
            Some(BaikeError::VerificationChallenge { term }) => {
                error!("❌ 触发人机验证，请稍后重试或更换代理: {}", term)
            }
            _ => error!("❌ 执行失败: {:#}", e),
        }
        std::process::exit(1);
    }

    if !cli.quiet {
        info!("✅ 完成，耗时: {:.3}秒", start.elapsed().as_secs_f64());
    }

    Ok(())
}

async fn run(cli: &Cli) -> Result<()> {
    let config = cli.to_config();

    match &cli.command {
        Command::Page { term } => {
            let client = BaikeClient::new(config).context("创建HTTP客户端失败")?;
            let lookup = client.page(term).await?;
            print_lookup(cli.json, &lookup, print_page)?;
        }
        Command::Search { word, results, page } => {
            let client = BaikeClient::new(config).context("创建HTTP客户端失败")?;
            let results = client.search(word, *results, *page).await?;
            if cli.json {
                print_json(&results)?;
            } else {
                print_search_results(&results);
            }
        }
        Command::Summary { term } => {
            let client = BaikeClient::new(config).context("创建HTTP客户端失败")?;
            let lookup = client.summary(term).await?;
            print_lookup(cli.json, &lookup, |text| println!("{}", text))?;
        }
        Command::Browse { term, .. } => {
            let mut client = BrowserSummaryClient::from_config(config);
            let items = client.fetch_summaries(term).await;
            if cli.json {
                print_json(&items)?;
            } else if items.is_empty() {
                println!("未获取到摘要: {}", term);
            } else {
                for (title, content) in &items {
                    println!("【{}】\n{}\n", title, content);
                }
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("序列化JSON失败")?;
    println!("{}", json);
    Ok(())
}

fn print_lookup<T: Serialize>(json: bool, lookup: &Lookup<T>, print_found: impl Fn(&T)) -> Result<()> {
    if json {
        return print_json(lookup);
    }

    match lookup {
        Lookup::Found(value) => print_found(value),
        Lookup::Disambiguation(d) => print_disambiguation(d),
    }
    Ok(())
}

fn print_page(page: &PageResult) {
    println!("标题: {}", page.info.title);
    println!("地址: {}", page.info.url);
    if let Some(ref view) = page.info.page_view {
        println!("浏览: {}", view);
    }
    if let Some(ref modified) = page.info.last_modified {
        println!("更新: {}", modified);
    }
    if let Some(ref creator) = page.info.creator {
        println!("创建者: {}", creator);
    }
    if !page.tags.is_empty() {
        println!("标签: {}", page.tags.join(", "));
    }

    println!("\n{}\n", page.outline());

    if !page.references.is_empty() {
        println!("参考资料:");
        for (i, reference) in page.references.iter().enumerate() {
            println!(
                "  [{}] {} {}",
                i + 1,
                reference.title,
                reference.url.as_deref().unwrap_or("")
            );
        }
    }
}

fn print_disambiguation(d: &Disambiguation) {
    println!("\"{}\" 是多义词，候选词条:", d.term);
    for (text, url) in d.candidates.iter() {
        println!("  {} -> {}", text, url);
    }
}

fn print_search_results(results: &[SearchResult]) {
    if results.is_empty() {
        println!("没有搜索结果");
        return;
    }
    for (i, result) in results.iter().enumerate() {
        println!("{}. {}\n   {}\n   {}", i + 1, result.title, result.url, result.description);
    }
}
