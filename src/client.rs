//! HTTP抓取入口
//!
//! 组合抓取、分类和提取：词条页面、搜索列表和摘要。

// 第三方crate导入
use serde::Serialize;
use tracing::{info, warn};

// 本地模块导入
use crate::api_constants::markers;
use crate::classifier::{classify, PageClassification};
use crate::config::BaikeConfig;
use crate::error::Result;
use crate::extractor::{extract_page, extract_title, LinkMap, PageResult};
use crate::html_processor::Document;
use crate::search::{parse_search_results, SearchResult};
use crate::summary::strip_footnote_marks;
use crate::web_crawler::{BaikeCrawler, FetchedPage};

/// 多义词消歧结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Disambiguation {
    /// 查询词
    pub term: String,
    /// 候选词条：链接文字 -> 绝对地址
    pub candidates: LinkMap,
}

/// 查询结果：找到目标内容，或需要调用方从候选词条中选择
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Lookup<T> {
    Found(T),
    Disambiguation(Disambiguation),
}

/// 分类页面，未收录和人机验证转换为错误
fn classify_page(doc: &Document, term: &str) -> Result<Option<Disambiguation>> {
    match classify(doc)? {
        PageClassification::Disambiguation(candidates) => {
            info!("🔀 词条存在多个义项: {} ({} 个候选)", term, candidates.len());
            Ok(Some(Disambiguation {
                term: term.to_string(),
                candidates,
            }))
        }
        PageClassification::NotFound => Err(crate::baike_error!(not_found, term)),
        PageClassification::VerificationChallenge => {
            warn!("🛑 触发人机验证: {}", term);
            Err(crate::baike_error!(verify, term))
        }
        PageClassification::Content => Ok(None),
    }
}

/// 解析抓取到的词条页面
pub fn analyze_page(page: &FetchedPage, term: &str) -> Result<Lookup<PageResult>> {
    let doc = Document::parse(&page.html)?;
    if let Some(disambiguation) = classify_page(&doc, term)? {
        return Ok(Lookup::Disambiguation(disambiguation));
    }
    Ok(Lookup::Found(extract_page(&doc, &page.url)?))
}

/// 确认页面为正文页面，返回其最终URL
fn resolve_page_url(page: &FetchedPage, term: &str) -> Result<Lookup<String>> {
    let doc = Document::parse(&page.html)?;
    if let Some(disambiguation) = classify_page(&doc, term)? {
        return Ok(Lookup::Disambiguation(disambiguation));
    }
    // 正文页面必须有标题
    extract_title(&doc)?;
    Ok(Lookup::Found(page.url.clone()))
}

/// 从词条页面提取摘要文本并去掉脚注
pub fn extract_page_summary(html: &str) -> Result<String> {
    let doc = Document::parse(html)?;
    let summary = doc
        .find_by_class(markers::SUMMARY)
        .ok_or_else(|| crate::baike_error!(html_parse, "页面缺少摘要元素"))?;
    Ok(strip_footnote_marks(&summary.text()))
}

/// 百科HTTP客户端
pub struct BaikeClient {
    crawler: BaikeCrawler,
}

impl BaikeClient {
    pub fn new(config: BaikeConfig) -> Result<Self> {
        Ok(Self {
            crawler: BaikeCrawler::new(config)?,
        })
    }

    /// 抓取并解析词条页面
    pub async fn page(&self, term: &str) -> Result<Lookup<PageResult>> {
        let fetched = self.crawler.fetch_term(term).await?;
        analyze_page(&fetched, term)
    }

    /// 搜索词条列表，`page_n` 从1开始
    pub async fn search(&self, word: &str, results_n: usize, page_n: usize) -> Result<Vec<SearchResult>> {
        let fetched = self.crawler.fetch_search(word, results_n, page_n).await?;
        let doc = Document::parse(&fetched.html)?;
        let results = parse_search_results(&doc)?;
        info!("🔎 搜索 \"{}\" 第 {} 页: {} 条结果", word, page_n, results.len());
        Ok(results)
    }

    /// 获取词条摘要
    ///
    /// 先通过词条查询确定页面地址，再以桌面浏览器身份重新请求该页面。
    pub async fn summary(&self, term: &str) -> Result<Lookup<String>> {
        let fetched = self.crawler.fetch_term(term).await?;
        let url = match resolve_page_url(&fetched, term)? {
            Lookup::Found(url) => url,
            Lookup::Disambiguation(d) => return Ok(Lookup::Disambiguation(d)),
        };

        let page = self.crawler.fetch_url(&url).await?;
        Ok(Lookup::Found(extract_page_summary(&page.html)?))
    }
}
