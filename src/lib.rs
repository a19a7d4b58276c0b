//! Baike CLI - 百度百科抓取工具库
//!
//! 这个库提供了词条页面抓取、页面分类、字段提取、搜索结果解析，
//! 以及基于无头浏览器的摘要获取等核心功能。

pub mod api_constants;
pub mod browser;
pub mod classifier;
pub mod client;
pub mod config;
pub mod error;
pub mod extractor;
pub mod html_processor;
pub mod proxy;
pub mod search;
pub mod summary;
pub mod utils;
pub mod web_crawler;

pub use client::{BaikeClient, Disambiguation, Lookup};
pub use error::{BaikeError, Result};
pub use extractor::PageResult;
