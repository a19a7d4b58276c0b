//! HTML处理模块
//!
//! 基于html5ever解析HTML，并提供按类名、id、标签和href模式查找元素，
//! 以及提取元素文本的能力。所有查找结果都按文档顺序返回。

// 第三方crate导入
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use regex::Regex;

// 本地模块导入
use crate::error::Result;

/// 解析后的HTML文档
///
/// 同时保留原始HTML文本，页面分类需要在原文中做字符串匹配。
pub struct Document {
    dom: RcDom,
    raw: String,
}

/// 文档中的单个元素节点
#[derive(Clone)]
pub struct Element {
    handle: Handle,
}

impl Document {
    /// 解析HTML字符串
    pub fn parse(html: &str) -> Result<Self> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())
            .map_err(|e| crate::baike_error!(html_parse, format!("{:?}", e)))?;

        Ok(Self {
            dom,
            raw: html.to_string(),
        })
    }

    /// 原始HTML文本
    pub fn raw_html(&self) -> &str {
        &self.raw
    }

    /// 按文档顺序返回所有元素
    pub fn elements(&self) -> Vec<Element> {
        descendant_elements(&self.dom.document)
    }

    /// 查找携带任一标记类名的所有元素
    pub fn find_all_by_class(&self, markers: &[&str]) -> Vec<Element> {
        self.elements()
            .into_iter()
            .filter(|el| el.matches_any_class(markers))
            .collect()
    }

    /// 查找第一个携带任一标记类名的元素
    pub fn find_by_class(&self, markers: &[&str]) -> Option<Element> {
        self.elements()
            .into_iter()
            .find(|el| el.matches_any_class(markers))
    }

    /// 按id查找元素
    pub fn find_by_id(&self, id: &str) -> Option<Element> {
        self.elements()
            .into_iter()
            .find(|el| el.attr("id").as_deref() == Some(id))
    }

    /// 按标签名查找所有元素
    pub fn find_all_by_tag(&self, tag: &str) -> Vec<Element> {
        self.elements()
            .into_iter()
            .filter(|el| el.tag_name() == tag)
            .collect()
    }

    /// 查找href属性匹配正则的所有元素
    pub fn find_all_by_href(&self, pattern: &Regex) -> Vec<Element> {
        self.elements()
            .into_iter()
            .filter(|el| el.attr("href").is_some_and(|href| pattern.is_match(&href)))
            .collect()
    }

    /// 文档的`<title>`文本
    pub fn title(&self) -> Option<String> {
        self.find_all_by_tag("title").first().map(Element::text)
    }
}

impl Element {
    /// 标签名
    pub fn tag_name(&self) -> String {
        match self.handle.data {
            NodeData::Element { ref name, .. } => name.local.as_ref().to_string(),
            _ => String::new(),
        }
    }

    /// 读取属性值
    pub fn attr(&self, attr_name: &str) -> Option<String> {
        match self.handle.data {
            NodeData::Element { ref attrs, .. } => attrs
                .borrow()
                .iter()
                .find(|attr| attr.name.local.as_ref() == attr_name)
                .map(|attr| attr.value.to_string()),
            _ => None,
        }
    }

    /// class属性拆分后的类名列表
    pub fn classes(&self) -> Vec<String> {
        self.attr("class")
            .map(|value| value.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// 是否携带指定标记
    ///
    /// 标记与任一类名相同即匹配；含空格的标记还会与完整的class属性比较，
    /// 并在所有类名都存在时匹配。
    pub fn has_class(&self, marker: &str) -> bool {
        let Some(class_attr) = self.attr("class") else {
            return false;
        };
        let classes: Vec<&str> = class_attr.split_whitespace().collect();

        if marker.contains(char::is_whitespace) {
            class_attr.trim() == marker.trim()
                || marker.split_whitespace().all(|m| classes.contains(&m))
        } else {
            classes.contains(&marker)
        }
    }

    /// 是否携带任一标记
    pub fn matches_any_class(&self, markers: &[&str]) -> bool {
        markers.iter().any(|marker| self.has_class(marker))
    }

    /// 所有后代文本节点按顺序拼接后的文本
    pub fn text(&self) -> String {
        let mut text = String::new();
        let mut stack = vec![self.handle.clone()];

        while let Some(node) = stack.pop() {
            if let NodeData::Text { ref contents } = node.data {
                text.push_str(&contents.borrow());
            }
            for child in node.children.borrow().iter().rev() {
                stack.push(child.clone());
            }
        }

        text
    }

    /// 后代中第一个指定标签的元素
    pub fn find_tag(&self, tag: &str) -> Option<Element> {
        descendant_elements(&self.handle)
            .into_iter()
            .skip(1)
            .find(|el| el.tag_name() == tag)
    }

    /// 后代中第一个携带任一标记的元素
    pub fn find_class(&self, markers: &[&str]) -> Option<Element> {
        descendant_elements(&self.handle)
            .into_iter()
            .skip(1)
            .find(|el| el.matches_any_class(markers))
    }
}

/// 深度优先遍历，按文档顺序收集元素（包含起点本身，如果它是元素）
fn descendant_elements(root: &Handle) -> Vec<Element> {
    let mut elements = Vec::new();
    let mut stack = vec![root.clone()];

    while let Some(node) = stack.pop() {
        if let NodeData::Element { .. } = node.data {
            elements.push(Element {
                handle: node.clone(),
            });
        }
        // 逆序入栈保证出栈顺序与文档顺序一致
        for child in node.children.borrow().iter().rev() {
            stack.push(child.clone());
        }
    }

    elements
}
