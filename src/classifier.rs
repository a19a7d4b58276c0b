//! 页面分类模块
//!
//! 在提取字段之前判断页面属于消歧列表、未收录、人机验证还是正文页面。

use crate::api_constants::{markers, site};
use crate::error::Result;
use crate::extractor::{extract_linked_terms, LinkMap};
use crate::html_processor::Document;

/// 页面分类结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageClassification {
    /// 多义词消歧页面，携带页面内的候选词条链接
    Disambiguation(LinkMap),
    /// 词条未收录
    NotFound,
    /// 人机验证页面
    VerificationChallenge,
    /// 正文页面
    Content,
}

/// 按固定顺序判断页面类型，先命中者为准
///
/// 消歧标记优先于未收录文字，未收录优先于人机验证。
pub fn classify(doc: &Document) -> Result<PageClassification> {
    if doc.find_by_class(markers::DISAMBIGUATION).is_some() {
        return Ok(PageClassification::Disambiguation(extract_linked_terms(doc)?));
    }
    if doc.raw_html().contains(site::NOT_FOUND_TEXT) {
        return Ok(PageClassification::NotFound);
    }
    if doc.find_by_id(site::VERIFY_ID).is_some() {
        return Ok(PageClassification::VerificationChallenge);
    }
    Ok(PageClassification::Content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_html(html: &str) -> PageClassification {
        classify(&Document::parse(html).unwrap()).unwrap()
    }

    #[test]
    fn test_disambiguation_page() {
        let html = r#"<html><body><div class="nslog:519">多义词</div>
<a href="/view/1.htm">苹果（水果）</a><a href="/view/2.htm">苹果（公司）</a></body></html>"#;
        match classify_html(html) {
            PageClassification::Disambiguation(links) => {
                assert_eq!(links.len(), 2);
                assert_eq!(
                    links.get("苹果（公司）"),
                    Some("http://baike.baidu.com/view/2.htm")
                );
            }
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn test_disambiguation_with_unresolvable_link() {
        let html = r#"<html><body><div class="nslog:519">多义词</div>
<a href="http://baike.baidu.com:abc/view/1.htm">坏</a><a href="/view/2.htm">苹果（公司）</a></body></html>"#;
        match classify_html(html) {
            PageClassification::Disambiguation(links) => {
                assert_eq!(links.len(), 1);
                assert!(links.get("苹果（公司）").is_some());
            }
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn test_disambiguation_takes_precedence() {
        let html = r#"<html><body><div class="nslog:519"></div><p>百度百科尚未收录词条</p>
<div id="vf"></div></body></html>"#;
        assert!(matches!(
            classify_html(html),
            PageClassification::Disambiguation(_)
        ));
    }

    #[test]
    fn test_not_found_anywhere_in_html() {
        let html = r#"<html><head><script>var msg = "百度百科尚未收录词条";</script></head>
<body><div id="vf"></div><div class="para">正文</div></body></html>"#;
        assert_eq!(classify_html(html), PageClassification::NotFound);
    }

    #[test]
    fn test_verification_challenge() {
        let html = r#"<html><body><div id="vf">请完成验证</div></body></html>"#;
        assert_eq!(classify_html(html), PageClassification::VerificationChallenge);
    }

    #[test]
    fn test_content_page() {
        let html = r#"<html><body><div class="para">正文</div></body></html>"#;
        assert_eq!(classify_html(html), PageClassification::Content);
    }
}
