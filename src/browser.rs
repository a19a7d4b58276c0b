//! 浏览器抓取模块 - 通过无头浏览器获取词条摘要
//!
//! 此模块负责：
//! - 以自定义User-Agent、反自动化检测参数和代理启动Chromium
//! - 管理浏览器会话的生命周期（Closed / Open / Failed）
//! - 在站点首页输入查询词并提交，限时等待结果出现
//! - 对消歧结果逐个打开候选词条获取摘要
//!
//! 每次获取摘要结束后浏览器会话都会关闭，无论成功还是失败。

// 标准库导入
use std::time::Duration;

// 第三方crate导入
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, warn};

// 本地模块导入
use crate::api_constants::{browser_config, class_selector, markers};
use crate::config::BaikeConfig;
use crate::error::Result;
use crate::html_processor::Document;
use crate::proxy::{ProxyDirectory, ProxyRotator};
use crate::summary::{extract_summary, SummaryOutcome};

/// 浏览器启动参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    /// User-Agent
    pub user_agent: String,
    /// 代理地址（host:port）
    pub proxy: Option<String>,
    /// 是否无头模式
    pub headless: bool,
}

/// 浏览器驱动接口
///
/// 生产环境使用 [`ChromiumDriver`]，测试中可替换为内存实现。
#[async_trait]
pub trait BrowserDriver: Send {
    /// 启动浏览器并打开一个空白页
    async fn launch(&mut self, options: &LaunchOptions) -> Result<()>;

    /// 导航到指定URL
    async fn goto(&mut self, url: &str) -> Result<()>;

    /// 在输入框中输入文字并按回车提交
    async fn type_and_submit(&mut self, selector: &str, text: &str) -> Result<()>;

    /// 当前页面是否存在匹配选择器的元素
    async fn is_present(&mut self, selector: &str) -> Result<bool>;

    /// 当前页面的HTML源码
    async fn page_source(&mut self) -> Result<String>;

    /// 关闭浏览器
    async fn shutdown(&mut self) -> Result<()>;
}

/// 基于chromiumoxide的浏览器驱动
#[derive(Default)]
pub struct ChromiumDriver {
    browser: Option<Browser>,
    page: Option<Page>,
    handler_task: Option<JoinHandle<()>>,
}

impl ChromiumDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn page(&self) -> Result<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| crate::baike_error!(browser, "访问页面", "浏览器未启动"))
    }

    fn browser_config(options: &LaunchOptions) -> Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .args(browser_config::STEALTH_ARGS.iter().copied())
            .arg(format!("--user-agent={}", options.user_agent));

        if !options.headless {
            builder = builder.with_head();
        }

        if let Some(ref proxy) = options.proxy {
            builder = builder.arg(format!("--proxy-server={}", proxy));
            info!("🌐 浏览器使用代理: {}", proxy);
        }

        builder
            .build()
            .map_err(|e| crate::baike_error!(browser, "配置", e))
    }
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    async fn launch(&mut self, options: &LaunchOptions) -> Result<()> {
        let config = Self::browser_config(options)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| crate::baike_error!(browser, "启动", e))?;

        // chromiumoxide需要持续消费事件流，部分CDP消息无法反序列化时继续处理
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP事件处理错误: {}", e);
                }
            }
            debug!("CDP事件处理任务结束");
        });

        // 先保存浏览器句柄，创建页面失败时shutdown仍能关闭进程
        let page = browser.new_page("about:blank").await;
        self.browser = Some(browser);
        self.handler_task = Some(handler_task);

        self.page = Some(page.map_err(|e| crate::baike_error!(browser, "创建页面", e))?);
        Ok(())
    }

    async fn goto(&mut self, url: &str) -> Result<()> {
        debug!("浏览器导航: {}", url);
        self.page()?
            .goto(url)
            .await
            .map_err(|e| crate::baike_error!(browser, "导航", e))?;
        Ok(())
    }

    async fn type_and_submit(&mut self, selector: &str, text: &str) -> Result<()> {
        let page = self.page()?;
        let input = page
            .find_element(selector)
            .await
            .map_err(|e| crate::baike_error!(browser, "查找输入框", e))?;

        input
            .click()
            .await
            .map_err(|e| crate::baike_error!(browser, "点击输入框", e))?
            .type_str(text)
            .await
            .map_err(|e| crate::baike_error!(browser, "输入", e))?
            .press_key("Enter")
            .await
            .map_err(|e| crate::baike_error!(browser, "提交", e))?;

        Ok(())
    }

    async fn is_present(&mut self, selector: &str) -> Result<bool> {
        // 元素不存在时find_element返回错误
        Ok(self.page()?.find_element(selector).await.is_ok())
    }

    async fn page_source(&mut self) -> Result<String> {
        self.page()?
            .content()
            .await
            .map_err(|e| crate::baike_error!(browser, "读取页面源码", e))
    }

    async fn shutdown(&mut self) -> Result<()> {
        self.page = None;

        let result = match self.browser.take() {
            Some(mut browser) => {
                let closed = browser
                    .close()
                    .await
                    .map(|_| ())
                    .map_err(|e| crate::baike_error!(browser, "关闭", e));
                if let Err(e) = browser.wait().await {
                    debug!("等待浏览器进程退出失败: {}", e);
                }
                closed
            }
            None => Ok(()),
        };

        if let Some(task) = self.handler_task.take() {
            task.abort();
        }

        result
    }
}

/// 浏览器会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// 未启动或已关闭
    Closed,
    /// 可用
    Open,
    /// 启动或使用过程中出错，下次使用前需要重建
    Failed,
}

/// 浏览器会话
///
/// 状态只通过 `ensure_open`、`mark_failed` 和 `close` 转换。
pub struct BrowserSession<D: BrowserDriver> {
    driver: D,
    state: SessionState,
}

impl<D: BrowserDriver> BrowserSession<D> {
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            state: SessionState::Closed,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// 确保会话可用并返回驱动
    ///
    /// - Closed: 启动浏览器
    /// - Failed: 先关闭残留的浏览器再重新启动
    /// - Open: 直接返回
    pub async fn ensure_open(&mut self, options: &LaunchOptions) -> Result<&mut D> {
        match self.state {
            SessionState::Open => return Ok(&mut self.driver),
            SessionState::Failed => {
                debug!("浏览器会话处于失败状态，重建会话");
                if let Err(e) = self.driver.shutdown().await {
                    debug!("关闭失败会话时出错（忽略）: {}", e);
                }
                self.state = SessionState::Closed;
            }
            SessionState::Closed => {}
        }

        match self.driver.launch(options).await {
            Ok(()) => {
                info!("🚀 浏览器会话已启动");
                self.state = SessionState::Open;
                Ok(&mut self.driver)
            }
            Err(e) => {
                self.state = SessionState::Failed;
                Err(e)
            }
        }
    }

    /// 标记会话失败
    pub fn mark_failed(&mut self) {
        if self.state == SessionState::Open {
            self.state = SessionState::Failed;
        }
    }

    /// 关闭会话，关闭出错时也会进入Closed
    pub async fn close(&mut self) {
        if self.state != SessionState::Closed {
            if let Err(e) = self.driver.shutdown().await {
                debug!("浏览器关闭错误（忽略）: {}", e);
            }
            debug!("🧹 浏览器会话已关闭");
        }
        self.state = SessionState::Closed;
    }
}

/// 限时等待任一选择器匹配的元素出现
///
/// 返回首个出现的选择器下标；超时返回`None`，不视为错误。
pub async fn wait_for_any<D: BrowserDriver>(
    driver: &mut D,
    selectors: &[String],
    timeout: Duration,
) -> Result<Option<usize>> {
    let deadline = Instant::now() + timeout;
    let poll = Duration::from_millis(browser_config::POLL_INTERVAL_MS);

    loop {
        for (index, selector) in selectors.iter().enumerate() {
            if driver.is_present(selector).await? {
                return Ok(Some(index));
            }
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        sleep(poll.min(deadline - now)).await;
    }
}

/// 解析浏览器渲染后的页面
fn parse_rendered(html: &str) -> Result<SummaryOutcome> {
    let doc = Document::parse(html)?;
    extract_summary(&doc)
}

/// 基于浏览器的摘要客户端
pub struct BrowserSummaryClient<D: BrowserDriver> {
    config: BaikeConfig,
    session: BrowserSession<D>,
    proxy: ProxyRotator,
}

impl BrowserSummaryClient<ChromiumDriver> {
    /// 使用Chromium和配置中的代理池创建客户端
    pub fn from_config(config: BaikeConfig) -> Self {
        let proxy = ProxyRotator::new(Box::new(ProxyDirectory::from_config(&config)));
        Self::new(config, ChromiumDriver::new(), proxy)
    }
}

impl<D: BrowserDriver> BrowserSummaryClient<D> {
    pub fn new(config: BaikeConfig, driver: D, proxy: ProxyRotator) -> Self {
        Self {
            config,
            session: BrowserSession::new(driver),
            proxy,
        }
    }

    pub fn session(&self) -> &BrowserSession<D> {
        &self.session
    }

    pub fn proxy(&self) -> &ProxyRotator {
        &self.proxy
    }

    fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            user_agent: self.config.user_agent().to_string(),
            proxy: self.proxy.current().map(str::to_string),
            headless: self.config.is_headless(),
        }
    }

    /// 获取词条摘要，返回 (标题, 摘要) 列表
    ///
    /// 出错时记录日志、更换代理并返回空列表；浏览器会话在返回前总会关闭。
    pub async fn fetch_summaries(&mut self, term: &str) -> Vec<(String, String)> {
        info!("🔍 浏览器获取摘要: {}", term);

        let result = self.collect_summaries(term).await;
        if result.is_err() {
            self.session.mark_failed();
        }
        self.session.close().await;

        match result {
            Ok(items) => {
                info!("✅ 获取到 {} 条摘要: {}", items.len(), term);
                items
            }
            Err(e) => {
                error!("❌ 获取摘要失败 [{}]: {}", term, e);
                self.proxy.rotate().await;
                Vec::new()
            }
        }
    }

    async fn collect_summaries(&mut self, term: &str) -> Result<Vec<(String, String)>> {
        if self.session.is_closed() {
            self.proxy.ensure_current().await;
        }
        let options = self.launch_options();
        let wait = self.config.wait_timeout();
        let summary_selector = class_selector(markers::SUMMARY[0]);
        let first_wait = [class_selector(markers::RESULT_COUNT[0]), summary_selector.clone()];

        let driver = self.session.ensure_open(&options).await?;

        driver.goto(self.config.base_url()).await?;
        driver
            .type_and_submit(browser_config::SEARCH_INPUT_SELECTOR, term)
            .await?;

        if wait_for_any(driver, &first_wait, wait).await?.is_none() {
            warn!("⏳ 等待搜索结果超时，使用当前页面继续: {}", term);
        }

        let html = driver.page_source().await?;
        let candidates = match parse_rendered(&html)? {
            SummaryOutcome::Summary { title, text } => return Ok(vec![(title, text)]),
            SummaryOutcome::Candidates { candidates, .. } => candidates,
        };

        info!("🔀 {} 存在 {} 个候选词条", term, candidates.len());
        let mut items = Vec::new();

        for candidate in candidates {
            driver.goto(&candidate.url).await?;
            if wait_for_any(driver, std::slice::from_ref(&summary_selector), wait)
                .await?
                .is_none()
            {
                warn!("⏳ 等待候选词条摘要超时: {}", candidate.url);
            }

            let html = driver.page_source().await?;
            match parse_rendered(&html)? {
                SummaryOutcome::Summary { title, text } => {
                    let title = if title.is_empty() { candidate.title } else { title };
                    items.push((title, text));
                }
                SummaryOutcome::Candidates { .. } => {
                    debug!("候选词条页面没有摘要: {}", candidate.url);
                }
            }
        }

        Ok(items)
    }
}
