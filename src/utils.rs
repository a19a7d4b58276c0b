use url::Url;

use crate::api_constants::{is_page_url, site};
use crate::error::Result;

/// 查询输入类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryInput {
    /// 词条名称
    Term(String),
    /// 可直接访问的词条URL
    PageUrl(Url),
}

/// 初始化日志系统
pub fn init_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// 判断输入是词条名还是词条URL
pub fn classify_input(input: &str) -> Result<QueryInput> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(crate::baike_error!(input_validation, input, "查询词不能为空"));
    }

    if is_page_url(trimmed) {
        let url = Url::parse(trimmed)?;
        return Ok(QueryInput::PageUrl(url));
    }

    Ok(QueryInput::Term(trimmed.to_string()))
}

/// 去掉标题中最后一个分隔符及其后的站点后缀
///
/// 没有分隔符时原样返回。
pub fn truncate_title(title: &str) -> String {
    match title.rfind(site::TITLE_SEPARATOR) {
        Some(pos) => title[..pos].to_string(),
        None => title.to_string(),
    }
}

/// 将href解析为绝对地址，已是绝对地址的保持不变
pub fn resolve_url(base: &str, href: &str) -> Result<String> {
    let base = Url::parse(base)?;
    Ok(base.join(href.trim())?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_title() {
        assert_eq!(truncate_title("Rust_百度百科"), "Rust");
        assert_eq!(truncate_title("C_语言_百度百科"), "C_语言");
        assert_eq!(truncate_title("无后缀"), "无后缀");
        assert_eq!(truncate_title("_"), "");
    }

    #[test]
    fn test_resolve_url() {
        assert_eq!(
            resolve_url("http://baike.baidu.com", "/view/1.htm").unwrap(),
            "http://baike.baidu.com/view/1.htm"
        );
        assert_eq!(
            resolve_url("http://baike.baidu.com", "https://example.com/a").unwrap(),
            "https://example.com/a"
        );
        assert_eq!(
            resolve_url("http://baike.baidu.com", "//baike.baidu.com/item/x").unwrap(),
            "http://baike.baidu.com/item/x"
        );
    }

    #[test]
    fn test_classify_input() {
        assert_eq!(
            classify_input(" 北京 ").unwrap(),
            QueryInput::Term("北京".to_string())
        );
        match classify_input("http://baike.baidu.com/item/北京").unwrap() {
            QueryInput::PageUrl(url) => assert_eq!(url.host_str(), Some("baike.baidu.com")),
            other => panic!("unexpected input: {:?}", other),
        }
        assert!(classify_input("   ").is_err());
    }
}
