//! 代理管理模块
//!
//! 从代理池获取随机代理，浏览器抓取失败后更换代理。

// 第三方crate导入
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

// 本地模块导入
use crate::api_constants::proxy_config;
use crate::config::BaikeConfig;
use crate::error::Result;

/// 代理来源
#[async_trait]
pub trait ProxySource: Send + Sync {
    /// 获取一个随机代理地址（host:port）
    async fn random_proxy(&self) -> Result<String>;
}

/// 基于HTTP接口的代理池
///
/// `GET http://{directory}/random` 以纯文本返回一个代理地址。
pub struct ProxyDirectory {
    directory: String,
    client: Client,
}

impl ProxyDirectory {
    pub fn new(directory: &str) -> Self {
        Self {
            directory: directory.to_string(),
            client: Client::new(),
        }
    }

    pub fn from_config(config: &BaikeConfig) -> Self {
        Self::new(config.proxy_directory())
    }

    /// 随机代理接口地址
    pub fn endpoint(&self) -> String {
        format!("http://{}{}", self.directory, proxy_config::RANDOM_PATH)
    }
}

#[async_trait]
impl ProxySource for ProxyDirectory {
    async fn random_proxy(&self) -> Result<String> {
        let endpoint = self.endpoint();
        debug!("请求代理池: {}", endpoint);

        let body = self
            .client
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| crate::baike_error!(proxy, self.directory, e))?
            .text()
            .await
            .map_err(|e| crate::baike_error!(proxy, self.directory, e))?;

        let proxy = body.trim().to_string();
        if proxy.is_empty() {
            return Err(crate::baike_error!(proxy, self.directory, "代理池返回空内容"));
        }

        Ok(proxy)
    }
}

/// 当前使用的代理身份
///
/// 失败时整体替换，不做部分更新。
pub struct ProxyRotator {
    source: Box<dyn ProxySource>,
    current: Option<String>,
}

impl ProxyRotator {
    pub fn new(source: Box<dyn ProxySource>) -> Self {
        Self {
            source,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// 尚未持有代理时从来源获取一个
    pub async fn ensure_current(&mut self) -> Option<&str> {
        if self.current.is_none() {
            return self.rotate().await;
        }
        self.current.as_deref()
    }

    /// 更换代理；获取失败时清空当前代理，下次直连
    pub async fn rotate(&mut self) -> Option<&str> {
        match self.source.random_proxy().await {
            Ok(proxy) => {
                info!("🔁 更换代理: {}", proxy);
                self.current = Some(proxy);
            }
            Err(e) => {
                warn!("⚠️  更换代理失败，将不使用代理: {}", e);
                self.current = None;
            }
        }
        self.current.as_deref()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 按顺序返回固定代理的测试来源
    pub struct FixedProxies {
        proxies: Vec<String>,
        next: AtomicUsize,
    }

    impl FixedProxies {
        pub fn new(proxies: &[&str]) -> Self {
            Self {
                proxies: proxies.iter().map(|p| p.to_string()).collect(),
                next: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ProxySource for FixedProxies {
        async fn random_proxy(&self) -> Result<String> {
            let index = self.next.fetch_add(1, Ordering::SeqCst);
            self.proxies
                .get(index)
                .cloned()
                .ok_or_else(|| crate::baike_error!(proxy, "fixed", "exhausted"))
        }
    }

    #[test]
    fn test_endpoint() {
        let directory = ProxyDirectory::new("127.0.0.1:5555");
        assert_eq!(directory.endpoint(), "http://127.0.0.1:5555/random");

        let config = BaikeConfig::new().with_proxy_directory("10.0.0.1:80");
        assert_eq!(
            ProxyDirectory::from_config(&config).endpoint(),
            "http://10.0.0.1:80/random"
        );
    }

    #[tokio::test]
    async fn test_rotation_replaces_wholesale() {
        let mut rotator = ProxyRotator::new(Box::new(FixedProxies::new(&["1.1.1.1:80", "2.2.2.2:80"])));
        assert_eq!(rotator.current(), None);

        assert_eq!(rotator.rotate().await, Some("1.1.1.1:80"));
        assert_eq!(rotator.rotate().await, Some("2.2.2.2:80"));
        assert_eq!(rotator.rotate().await, None);
        assert_eq!(rotator.current(), None);
    }

    #[tokio::test]
    async fn test_ensure_current_fetches_only_when_empty() {
        let mut rotator = ProxyRotator::new(Box::new(FixedProxies::new(&["1.1.1.1:80", "2.2.2.2:80"])));
        assert_eq!(rotator.current(), None);

        assert_eq!(rotator.ensure_current().await, Some("1.1.1.1:80"));
        assert_eq!(rotator.ensure_current().await, Some("1.1.1.1:80"));
    }
}
