//! Web抓取模块 - 通过HTTP获取百科页面
//!
//! 此模块负责：
//! - 根据词条名或词条URL构造请求
//! - 获取原始HTML并以UTF-8解码
//! - 记录跟随重定向后的最终URL

// 第三方crate导入
use reqwest::header::USER_AGENT;
use reqwest::{Client, Request};
use tracing::{debug, info, warn};

// 本地模块导入
use crate::api_constants::site;
use crate::config::BaikeConfig;
use crate::error::Result;
use crate::utils::{classify_input, QueryInput};

/// 抓取到的页面
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// 原始HTML
    pub html: String,
    /// 跟随重定向后的最终URL
    pub url: String,
}

/// 百科页面抓取器
///
/// 封装reqwest客户端，所有请求都按顺序执行，不做自动重试。
pub struct BaikeCrawler {
    config: BaikeConfig,
    client: Client,
}

impl BaikeCrawler {
    /// 创建新的抓取器实例
    pub fn new(config: BaikeConfig) -> Result<Self> {
        let mut builder = Client::builder().timeout(config.timeout());

        if let Some(proxy) = config.http_proxy() {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| crate::baike_error!(config, "http_proxy", e))?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;
        Ok(Self { config, client })
    }

    /// 构造词条查询请求
    ///
    /// 输入为词条URL时直接访问，否则通过 `/search/word` 查询。
    pub fn term_request(&self, term: &str) -> Result<Request> {
        let request = match classify_input(term)? {
            QueryInput::PageUrl(url) => self.client.get(url),
            QueryInput::Term(word) => self
                .client
                .get(format!("{}{}", self.config.base_url(), site::SEARCH_WORD_PATH))
                .query(&[("pic", "1"), ("enc", "utf-8"), ("word", word.as_str())]),
        };

        Ok(request.build()?)
    }

    /// 构造搜索列表请求
    pub fn search_request(&self, word: &str, results_n: usize, page_n: usize) -> Result<Request> {
        if word.trim().is_empty() {
            return Err(crate::baike_error!(input_validation, word, "搜索词不能为空"));
        }
        if results_n == 0 || page_n == 0 {
            return Err(crate::baike_error!(
                input_validation,
                format!("rn={}, page={}", results_n, page_n),
                "每页结果数和页码必须大于0"
            ));
        }

        let pn = (page_n - 1) * results_n;
        let request = self
            .client
            .get(format!("{}{}", self.config.base_url(), site::SEARCH_PATH))
            .query(&[
                ("type", "0".to_string()),
                ("submit", "search".to_string()),
                ("pn", pn.to_string()),
                ("rn", results_n.to_string()),
                ("word", word.trim().to_string()),
            ])
            .build()?;

        Ok(request)
    }

    /// 构造直接访问页面的请求，带桌面浏览器User-Agent
    pub fn page_request(&self, url: &str) -> Result<Request> {
        let request = self
            .client
            .get(url)
            .header(USER_AGENT, self.config.user_agent())
            .build()?;
        Ok(request)
    }

    /// 执行请求并读取页面
    pub async fn execute(&self, request: Request) -> Result<FetchedPage> {
        info!("🕷️ 请求页面: {}", request.url());

        let response = self.client.execute(request).await?;
        let status = response.status();
        let url = response.url().to_string();

        if !status.is_success() {
            warn!("⚠️  页面返回非成功状态 [{}]: {}", status, url);
        }

        let bytes = response.bytes().await?;
        let html = String::from_utf8(bytes.to_vec())
            .map_err(|e| crate::baike_error!(html_parse, format!("页面不是有效的UTF-8: {}", e)))?;

        debug!("✅ 页面获取完成: {} ({} 字节)", url, html.len());
        Ok(FetchedPage { html, url })
    }

    /// 抓取词条页面
    pub async fn fetch_term(&self, term: &str) -> Result<FetchedPage> {
        let request = self.term_request(term)?;
        self.execute(request).await
    }

    /// 抓取搜索列表
    pub async fn fetch_search(&self, word: &str, results_n: usize, page_n: usize) -> Result<FetchedPage> {
        let request = self.search_request(word, results_n, page_n)?;
        self.execute(request).await
    }

    /// 直接抓取指定URL
    pub async fn fetch_url(&self, url: &str) -> Result<FetchedPage> {
        let request = self.page_request(url)?;
        self.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crawler() -> BaikeCrawler {
        BaikeCrawler::new(BaikeConfig::new()).unwrap()
    }

    fn query_pairs(request: &Request) -> Vec<(String, String)> {
        request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_term_request_for_word() {
        let request = crawler().term_request("北京").unwrap();
        assert_eq!(request.url().path(), "/search/word");
        assert_eq!(request.url().host_str(), Some("baike.baidu.com"));
        assert_eq!(
            query_pairs(&request),
            vec![
                ("pic".to_string(), "1".to_string()),
                ("enc".to_string(), "utf-8".to_string()),
                ("word".to_string(), "北京".to_string()),
            ]
        );
    }

    #[test]
    fn test_term_request_for_page_url() {
        let request = crawler()
            .term_request("http://baike.baidu.com/view/1234.htm")
            .unwrap();
        assert_eq!(request.url().as_str(), "http://baike.baidu.com/view/1234.htm");
        assert!(request.url().query().is_none());
    }

    #[test]
    fn test_term_request_rejects_empty() {
        assert!(crawler().term_request("  ").is_err());
    }

    #[test]
    fn test_search_request_pagination() {
        let request = crawler().search_request("Rust", 10, 3).unwrap();
        assert_eq!(request.url().path(), "/search");
        let pairs = query_pairs(&request);
        assert!(pairs.contains(&("pn".to_string(), "20".to_string())));
        assert!(pairs.contains(&("rn".to_string(), "10".to_string())));
        assert!(pairs.contains(&("type".to_string(), "0".to_string())));
        assert!(pairs.contains(&("submit".to_string(), "search".to_string())));
        assert!(pairs.contains(&("word".to_string(), "Rust".to_string())));
    }

    #[test]
    fn test_search_request_validation() {
        assert!(crawler().search_request("", 10, 1).is_err());
        assert!(crawler().search_request("Rust", 0, 1).is_err());
        assert!(crawler().search_request("Rust", 10, 0).is_err());
    }

    #[test]
    fn test_page_request_user_agent() {
        let config = BaikeConfig::new().with_user_agent("test-agent");
        let crawler = BaikeCrawler::new(config).unwrap();
        let request = crawler.page_request("http://baike.baidu.com/item/x").unwrap();
        assert_eq!(request.headers().get(USER_AGENT).unwrap(), "test-agent");
    }

    #[test]
    fn test_base_url_override() {
        let config = BaikeConfig::new().with_base_url("http://127.0.0.1:9000");
        let crawler = BaikeCrawler::new(config).unwrap();
        let request = crawler.term_request("Rust").unwrap();
        assert_eq!(request.url().port(), Some(9000));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host() {
        let config = BaikeConfig::new()
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(2);
        let crawler = BaikeCrawler::new(config).unwrap();
        let result = crawler.fetch_term("Rust").await;
        assert!(matches!(result, Err(crate::BaikeError::Network { .. })));
    }
}
