//! 配置管理模块
//!
//! 提供CLI参数解析和抓取配置管理功能

// 标准库导入
use std::time::Duration;

// 第三方crate导入
use clap::{Parser, Subcommand};

// 本地模块导入
use crate::api_constants::{browser_config, crawler_config, proxy_config, site};

/// 抓取配置结构体
///
/// 支持Builder模式进行链式配置。
///
/// # Examples
///
/// ```rust
/// use baike::config::BaikeConfig;
///
/// let config = BaikeConfig::new()
///     .with_timeout(10)
///     .with_wait_timeout(5)
///     .with_proxy_directory("127.0.0.1:5555");
/// ```
#[derive(Debug, Clone)]
pub struct BaikeConfig {
    /// 站点根地址
    base_url: String,
    /// 请求使用的User-Agent
    user_agent: String,
    /// HTTP请求超时（秒）
    timeout: u64,
    /// 浏览器等待元素的超时（秒）
    wait_timeout: u64,
    /// 代理池地址（host:port）
    proxy_directory: String,
    /// HTTP请求使用的代理（可选）
    http_proxy: Option<String>,
    /// 是否以无头模式启动浏览器
    headless: bool,
}

impl BaikeConfig {
    /// 创建新的配置实例
    ///
    /// 返回具有默认值的配置实例：
    /// - 站点地址: http://baike.baidu.com
    /// - 请求超时: 30秒
    /// - 元素等待超时: 10秒
    /// - 代理池: 192.168.3.224:5555
    /// - 无头模式: true
    pub fn new() -> Self {
        Self {
            base_url: site::BASE_URL.to_string(),
            user_agent: crawler_config::DEFAULT_USER_AGENT.to_string(),
            timeout: crawler_config::DEFAULT_TIMEOUT,
            wait_timeout: browser_config::DEFAULT_WAIT_TIMEOUT,
            proxy_directory: proxy_config::DEFAULT_PROXY_DIRECTORY.to_string(),
            http_proxy: None,
            headless: true,
        }
    }

    /// 从环境变量读取代理池地址，其余使用默认值
    pub fn from_env() -> Self {
        let mut config = Self::new();
        if let Ok(directory) = std::env::var(proxy_config::PROXY_ENV_VAR) {
            if !directory.trim().is_empty() {
                config.proxy_directory = directory.trim().to_string();
            }
        }
        config
    }

    /// 获取站点根地址
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 获取User-Agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// 获取请求超时
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// 获取元素等待超时
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout)
    }

    /// 获取代理池地址
    pub fn proxy_directory(&self) -> &str {
        &self.proxy_directory
    }

    /// 获取HTTP代理
    pub fn http_proxy(&self) -> Option<&str> {
        self.http_proxy.as_deref()
    }

    /// 是否无头模式
    pub fn is_headless(&self) -> bool {
        self.headless
    }

    /// 设置站点根地址
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// 设置User-Agent
    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    /// 设置请求超时（秒）
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// 设置元素等待超时（秒）
    pub fn with_wait_timeout(mut self, seconds: u64) -> Self {
        self.wait_timeout = seconds;
        self
    }

    /// 设置代理池地址
    pub fn with_proxy_directory(mut self, directory: &str) -> Self {
        self.proxy_directory = directory.to_string();
        self
    }

    /// 设置HTTP代理
    pub fn with_http_proxy(mut self, proxy: Option<&str>) -> Self {
        self.http_proxy = proxy.map(str::to_string);
        self
    }

    /// 设置是否无头模式
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }
}

impl Default for BaikeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// CLI参数结构
#[derive(Parser)]
#[command(author, version, about = "百度百科抓取工具 - 词条解析、搜索与摘要获取", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// 以JSON格式输出结果
    #[arg(long, global = true)]
    pub json: bool,

    /// 详细输出模式
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 静默模式 (仅输出结果)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// 请求超时时间（秒）
    #[arg(long, global = true, default_value_t = crawler_config::DEFAULT_TIMEOUT)]
    pub timeout: u64,

    /// 自定义User-Agent
    #[arg(long, global = true)]
    pub user_agent: Option<String>,

    /// HTTP请求使用的代理地址
    #[arg(long, global = true)]
    pub proxy: Option<String>,
}

/// 子命令
#[derive(Subcommand)]
pub enum Command {
    /// 抓取并解析词条页面
    Page {
        /// 词条名称或词条URL
        term: String,
    },

    /// 搜索词条列表
    Search {
        /// 搜索关键词
        word: String,

        /// 每页结果数
        #[arg(long, default_value_t = crawler_config::DEFAULT_RESULTS_PER_PAGE)]
        results: usize,

        /// 页码（从1开始）
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// 通过HTTP获取词条摘要
    Summary {
        /// 词条名称或词条URL
        term: String,
    },

    /// 通过无头浏览器获取词条摘要
    Browse {
        /// 词条名称
        term: String,

        /// 等待页面元素的超时时间（秒）
        #[arg(long, default_value_t = browser_config::DEFAULT_WAIT_TIMEOUT)]
        wait_timeout: u64,

        /// 显示浏览器窗口
        #[arg(long)]
        headful: bool,
    },
}

impl Cli {
    /// 根据CLI参数构建抓取配置
    pub fn to_config(&self) -> BaikeConfig {
        let mut config = BaikeConfig::from_env()
            .with_timeout(self.timeout)
            .with_http_proxy(self.proxy.as_deref());

        if let Some(ref user_agent) = self.user_agent {
            config = config.with_user_agent(user_agent);
        }

        if let Command::Browse {
            wait_timeout,
            headful,
            ..
        } = self.command
        {
            config = config.with_wait_timeout(wait_timeout).headless(!headful);
        }

        config
    }
}
