//! 摘要提取模块
//!
//! 处理浏览器渲染后的搜索结果页或词条页：存在摘要时提取摘要文本，
//! 否则将页面视为候选词条列表。

// 标准库导入
use std::sync::OnceLock;

// 第三方crate导入
use regex::Regex;
use serde::Serialize;
use tracing::debug;

// 本地模块导入
use crate::api_constants::{markers, site};
use crate::error::Result;
use crate::html_processor::Document;
use crate::utils::{resolve_url, truncate_title};

/// 候选词条
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub title: String,
    pub url: String,
}

/// 摘要提取结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SummaryOutcome {
    /// 页面包含摘要
    Summary { title: String, text: String },
    /// 页面为候选词条列表
    Candidates {
        title: String,
        candidates: Vec<Candidate>,
    },
}

fn footnote_regex() -> &'static Regex {
    static FOOTNOTE: OnceLock<Regex> = OnceLock::new();
    FOOTNOTE.get_or_init(|| Regex::new(r"\s*\[\d+\]").expect("footnote pattern is valid"))
}

/// 去掉正文中的脚注标记，如 `[1]`、` [12]`
pub fn strip_footnotes(text: &str) -> String {
    footnote_regex().replace_all(text, "").to_string()
}

fn footnote_mark_regex() -> &'static Regex {
    static FOOTNOTE_MARK: OnceLock<Regex> = OnceLock::new();
    FOOTNOTE_MARK.get_or_init(|| Regex::new(r"\[\d+\]").expect("footnote pattern is valid"))
}

/// 只去掉脚注标记本身，保留其前面的空白
pub fn strip_footnote_marks(text: &str) -> String {
    footnote_mark_regex().replace_all(text, "").to_string()
}

/// 同义词面板文字：在标签后插入冒号
fn format_synonym(text: &str) -> String {
    let text = text.trim();
    match text.strip_prefix(markers::SYNONYM_LABEL) {
        Some(rest) => format!("{}：{}", markers::SYNONYM_LABEL, rest.trim_start()),
        None => text.replacen(
            markers::SYNONYM_LABEL,
            &format!("{}：", markers::SYNONYM_LABEL),
            1,
        ),
    }
}

/// 从摘要元素提取文本，存在同义词面板时将其作为首行
pub fn extract_summary_text(doc: &Document) -> Option<String> {
    let summary = doc.find_by_class(markers::SUMMARY)?;
    let text = strip_footnotes(&summary.text());

    match doc.find_by_class(markers::SYNONYM) {
        Some(synonym) => Some(format!("{}\n{}", format_synonym(&synonym.text()), text)),
        None => Some(text),
    }
}

/// 提取搜索结果页中的候选词条
pub fn extract_candidates(doc: &Document) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for anchor in doc.find_all_by_class(markers::CANDIDATE_TITLE) {
        if anchor.tag_name() != "a" {
            continue;
        }
        let Some(href) = anchor.attr("href") else {
            continue;
        };
        match resolve_url(site::BASE_URL, &href) {
            Ok(url) => candidates.push(Candidate {
                title: truncate_title(anchor.text().trim()),
                url,
            }),
            Err(e) => debug!("跳过无法解析的候选链接 {}: {}", href, e),
        }
    }

    candidates
}

/// 从渲染后的页面提取摘要或候选词条
pub fn extract_summary(doc: &Document) -> Result<SummaryOutcome> {
    let title = doc.title().map(|t| truncate_title(&t)).unwrap_or_default();

    if let Some(text) = extract_summary_text(doc) {
        return Ok(SummaryOutcome::Summary { title, text });
    }

    Ok(SummaryOutcome::Candidates {
        title,
        candidates: extract_candidates(doc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_footnotes() {
        assert_eq!(strip_footnotes("北京是首都[1]，历史悠久 [23]。"), "北京是首都，历史悠久。");
        assert_eq!(strip_footnotes("没有脚注"), "没有脚注");
        assert_eq!(strip_footnotes("[a]保留"), "[a]保留");
        assert!(!footnote_regex().is_match(&strip_footnotes("a[1][2] [3]b")));
    }

    #[test]
    fn test_strip_footnote_marks_keeps_whitespace() {
        assert_eq!(strip_footnote_marks("首都 [1]，历史[23]。"), "首都 ，历史。");
        assert!(!footnote_mark_regex().is_match(&strip_footnote_marks("a[1][2] [3]b")));
        assert_eq!(strip_footnote_marks("[a]保留"), "[a]保留");
    }

    #[test]
    fn test_summary_with_synonym() {
        let html = r#"<html><head><title>北京_百度百科</title></head><body>
<div class="lemmaSynonym">同义词 北平一般指北京</div>
<div class="lemmaSummary__tEeY J-summary">北京是中华人民共和国的首都[1]。</div>
</body></html>"#;
        let doc = Document::parse(html).unwrap();
        assert_eq!(
            extract_summary(&doc).unwrap(),
            SummaryOutcome::Summary {
                title: "北京".to_string(),
                text: "同义词：北平一般指北京\n北京是中华人民共和国的首都。".to_string(),
            }
        );
    }

    #[test]
    fn test_summary_without_synonym() {
        let html = r#"<html><head><title>Rust_百度百科</title></head><body>
<div class="lemmaSummary__tEeY J-summary">Rust是一门编程语言 [2]</div></body></html>"#;
        let doc = Document::parse(html).unwrap();
        assert_eq!(
            extract_summary_text(&doc).as_deref(),
            Some("Rust是一门编程语言")
        );
    }

    #[test]
    fn test_candidates_when_no_summary() {
        let html = r#"<html><head><title>苹果_百度百科搜索</title></head><body>
<span class="result-count">找到2个结果</span>
<a class="result-title" href="/item/苹果/5670">苹果_百度百科</a>
<div class="result-title">不是链接</div>
<a class="result-title" href="https://baike.baidu.com/item/苹果公司">苹果公司_百度百科</a>
</body></html>"#;
        let doc = Document::parse(html).unwrap();
        match extract_summary(&doc).unwrap() {
            SummaryOutcome::Candidates { title, candidates } => {
                assert_eq!(title, "苹果");
                assert_eq!(candidates.len(), 2);
                assert_eq!(candidates[0].title, "苹果");
                assert!(candidates[0].url.starts_with("http://baike.baidu.com/item/"));
                assert_eq!(candidates[1].title, "苹果公司");
                assert!(candidates[1].url.starts_with("https://baike.baidu.com/item/"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_candidates_skip_unresolvable_href() {
        let html = r#"<html><body>
<a class="result-title" href="http://baike.baidu.com:abc/item/x">坏_百度百科</a>
<a class="result-title" href="/item/ok">好_百度百科</a>
</body></html>"#;
        let doc = Document::parse(html).unwrap();
        let candidates = extract_candidates(&doc);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "好");
        assert_eq!(candidates[0].url, "http://baike.baidu.com/item/ok");
    }

    #[test]
    fn test_format_synonym() {
        assert_eq!(format_synonym("同义词 A一般指B"), "同义词：A一般指B");
        assert_eq!(format_synonym("  同义词A"), "同义词：A");
        assert_eq!(format_synonym("无标签"), "无标签");
    }
}
