//! 搜索列表解析

use serde::Serialize;

use crate::api_constants::markers;
use crate::error::Result;
use crate::html_processor::Document;
use crate::utils::truncate_title;

/// 单条搜索结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub description: String,
}

/// 解析搜索列表页面
///
/// 结果项缺少链接或描述时返回解析错误，不做静默跳过。
pub fn parse_search_results(doc: &Document) -> Result<Vec<SearchResult>> {
    let mut results = Vec::new();

    for item in doc.find_all_by_class(markers::SEARCH_ITEM) {
        let anchor = item
            .find_tag("a")
            .ok_or_else(|| crate::baike_error!(html_parse, "搜索结果项缺少链接"))?;
        let description = item
            .find_class(markers::SEARCH_ABSTRACT)
            .ok_or_else(|| crate::baike_error!(html_parse, "搜索结果项缺少描述"))?;

        results.push(SearchResult {
            title: truncate_title(&anchor.text()),
            url: anchor.attr("href").unwrap_or_default(),
            description: description.text().trim().to_string(),
        });
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_results() {
        let html = r#"<html><body>
<dl class="f"><dt><a href="http://baike.baidu.com/item/Rust">Rust_百度百科</a></dt>
<dd class="abstract">  一门系统编程语言。 </dd></dl>
<dl class="f"><dt><a href="http://baike.baidu.com/item/Go">Go语言_百度百科</a></dt>
<dd class="abstract">谷歌开发的语言</dd></dl>
</body></html>"#;
        let doc = Document::parse(html).unwrap();
        let results = parse_search_results(&doc).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(
            results[0],
            SearchResult {
                title: "Rust".to_string(),
                url: "http://baike.baidu.com/item/Rust".to_string(),
                description: "一门系统编程语言。".to_string(),
            }
        );
        assert_eq!(results[1].title, "Go语言");
    }

    #[test]
    fn test_empty_listing() {
        let doc = Document::parse("<html><body><p>无结果</p></body></html>").unwrap();
        assert!(parse_search_results(&doc).unwrap().is_empty());
    }

    #[test]
    fn test_missing_abstract_is_error() {
        let html = r#"<html><body><div class="f"><a href="/item/x">x_百度百科</a></div></body></html>"#;
        let doc = Document::parse(html).unwrap();
        assert!(parse_search_results(&doc).is_err());
    }
}
