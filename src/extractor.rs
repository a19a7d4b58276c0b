//! 词条字段提取模块
//!
//! 从已判定为正文的词条页面中提取标题、正文大纲、标签、参考资料和内部链接。

// 标准库导入
use std::collections::HashMap;

// 第三方crate导入
use regex::Regex;
use serde::{Serialize, Serializer};
use tracing::debug;

// 本地模块导入
use crate::api_constants::{markers, site};
use crate::error::Result;
use crate::html_processor::{Document, Element};
use crate::utils::{resolve_url, truncate_title};

/// 正文块类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// 词条标题
    Title,
    /// 一级目录
    Section,
    /// 二级目录
    Subsection,
    /// 段落
    Paragraph,
}

impl BlockKind {
    /// 根据元素携带的标记判定块类型，按标题、一级、二级、段落的优先级
    fn of(element: &Element) -> Option<Self> {
        if element.has_class(markers::TITLE_H1) {
            Some(BlockKind::Title)
        } else if element.has_class(markers::HEADLINE_1) {
            Some(BlockKind::Section)
        } else if element.has_class(markers::HEADLINE_2) {
            Some(BlockKind::Subsection)
        } else if element.has_class(markers::PARA) {
            Some(BlockKind::Paragraph)
        } else {
            None
        }
    }
}

/// 正文块
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentBlock {
    pub kind: BlockKind,
    pub text: String,
}

impl ContentBlock {
    /// 渲染为纯文本大纲格式
    pub fn render(&self) -> String {
        match self.kind {
            BlockKind::Title => format!("==== {} ====\n\n", self.text),
            BlockKind::Section => format!("\n== {} ==\n", self.text),
            BlockKind::Subsection => format!("\n* {} *\n", self.text),
            BlockKind::Paragraph => self.text.clone(),
        }
    }
}

/// 参考资料
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    pub title: String,
    pub url: Option<String>,
}

/// 保持插入顺序、键唯一的链接表
///
/// 重复插入同一键时更新值并保留其首次出现的位置。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkMap {
    entries: Vec<(String, String)>,
    positions: HashMap<String, usize>,
}

impl LinkMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入链接，已存在的键以后插入的值为准
    pub fn insert(&mut self, text: String, url: String) {
        match self.positions.get(&text) {
            Some(&index) => self.entries[index].1 = url,
            None => {
                self.positions.insert(text.clone(), self.entries.len());
                self.entries.push((text, url));
            }
        }
    }

    pub fn get(&self, text: &str) -> Option<&str> {
        self.positions
            .get(text)
            .map(|&index| self.entries[index].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for LinkMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// 词条基本信息
///
/// 浏览量、最后修改时间和创建者各自独立提取，缺失时为`None`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub title: String,
    pub url: String,
    pub page_view: Option<String>,
    pub last_modified: Option<String>,
    pub creator: Option<String>,
}

/// 词条页面的完整提取结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageResult {
    pub info: PageInfo,
    pub content: Vec<ContentBlock>,
    pub tags: Vec<String>,
    pub references: Vec<Reference>,
    pub linked_terms: LinkMap,
}

impl PageResult {
    pub fn title(&self) -> &str {
        &self.info.title
    }

    pub fn url(&self) -> &str {
        &self.info.url
    }

    /// 正文的大纲文本
    pub fn outline(&self) -> String {
        render_outline(&self.content)
    }
}

/// 提取页面标题，去掉最后一个分隔符之后的站点后缀
pub fn extract_title(doc: &Document) -> Result<String> {
    let title = doc
        .title()
        .ok_or_else(|| crate::baike_error!(html_parse, "页面缺少<title>元素"))?;
    Ok(truncate_title(&title))
}

/// 按文档顺序提取正文块
pub fn extract_content(doc: &Document) -> Vec<ContentBlock> {
    doc.find_all_by_class(markers::CONTENT)
        .iter()
        .filter_map(|el| {
            BlockKind::of(el).map(|kind| ContentBlock {
                kind,
                text: el.text(),
            })
        })
        .collect()
}

/// 将正文块渲染为以换行分隔的大纲文本
pub fn render_outline(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .map(ContentBlock::render)
        .collect::<Vec<_>>()
        .join("\n")
}

/// 提取词条标签，允许重复
pub fn extract_tags(doc: &Document) -> Vec<String> {
    doc.find_all_by_class(markers::TAG)
        .iter()
        .map(Element::text)
        .collect()
}

/// 提取参考资料
pub fn extract_references(doc: &Document) -> Vec<Reference> {
    doc.find_all_by_class(markers::REFERENCE)
        .iter()
        .map(|el| Reference {
            title: el.text(),
            url: el.attr("href"),
        })
        .collect()
}

/// 提取指向其他词条的内部链接，相对地址补全为绝对地址
pub fn extract_linked_terms(doc: &Document) -> Result<LinkMap> {
    let pattern = Regex::new(site::VIEW_HREF_PATTERN)
        .map_err(|e| crate::baike_error!(html_parse, format!("编译链接正则失败: {}", e)))?;

    let mut links = LinkMap::new();
    for anchor in doc.find_all_by_href(&pattern) {
        let Some(href) = anchor.attr("href") else {
            continue;
        };
        match resolve_url(site::BASE_URL, &href) {
            Ok(url) => links.insert(anchor.text(), url),
            Err(e) => debug!("跳过无法解析的链接 {}: {}", href, e),
        }
    }

    Ok(links)
}

/// 提取词条基本信息
pub fn extract_info(doc: &Document, url: &str) -> Result<PageInfo> {
    let page_view = doc.find_by_id(markers::PAGE_VIEW_ID).map(|el| el.text());
    let last_modified = doc.find_by_id(markers::LAST_MODIFY_ID).map(|el| el.text());
    let creator = doc.find_by_class(markers::CREATOR).map(|el| el.text());

    if page_view.is_none() || last_modified.is_none() || creator.is_none() {
        debug!(
            "词条信息不完整: page_view={}, last_modified={}, creator={}",
            page_view.is_some(),
            last_modified.is_some(),
            creator.is_some()
        );
    }

    Ok(PageInfo {
        title: extract_title(doc)?,
        url: url.to_string(),
        page_view,
        last_modified,
        creator,
    })
}

/// 组装完整的词条提取结果
pub fn extract_page(doc: &Document, url: &str) -> Result<PageResult> {
    Ok(PageResult {
        info: extract_info(doc, url)?,
        content: extract_content(doc),
        tags: extract_tags(doc),
        references: extract_references(doc),
        linked_terms: extract_linked_terms(doc)?,
    })
}
