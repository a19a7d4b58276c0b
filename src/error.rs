//! 统一错误处理模块
//!
//! 提供Baike CLI项目的统一错误类型定义和处理机制

// 标准库导入
use std::fmt;

// 第三方crate导入
use anyhow::Error as AnyhowError;

/// Baike CLI 统一错误类型
///
/// 多义词消歧不属于错误，它作为 [`crate::client::Lookup::Disambiguation`] 正常返回。
#[derive(Debug)]
pub enum BaikeError {
    /// 网络请求相关错误
    Network {
        /// 错误消息
        message: String,
        /// HTTP状态码（如果适用）
        status_code: Option<u16>,
    },

    /// HTML解析或预期元素缺失
    HtmlParse {
        /// 具体错误信息
        details: String,
    },

    /// 百科尚未收录该词条
    PageNotFound {
        /// 查询词
        term: String,
    },

    /// 站点返回了人机验证页面
    VerificationChallenge {
        /// 查询词
        term: String,
    },

    /// 浏览器自动化错误
    Browser {
        /// 操作类型（启动、导航、输入等）
        operation: String,
        /// 错误详情
        details: String,
    },

    /// 代理池相关错误
    Proxy {
        /// 代理池地址
        directory: String,
        /// 错误详情
        details: String,
    },

    /// 配置相关错误
    Configuration {
        /// 配置项名称
        field: String,
        /// 错误原因
        reason: String,
    },

    /// 输入验证错误
    InputValidation {
        /// 输入值
        input: String,
        /// 验证失败原因
        reason: String,
    },

    /// 内部处理错误（包装anyhow::Error）
    Internal {
        /// 包装的错误
        source: AnyhowError,
    },
}

impl fmt::Display for BaikeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaikeError::Network { message, status_code } => {
                if let Some(code) = status_code {
                    write!(f, "网络请求失败 [{}]: {}", code, message)
                } else {
                    write!(f, "网络请求失败: {}", message)
                }
            }
            BaikeError::HtmlParse { details } => {
                write!(f, "HTML解析失败: {}", details)
            }
            BaikeError::PageNotFound { term } => {
                write!(f, "百科尚未收录词条: {}", term)
            }
            BaikeError::VerificationChallenge { term } => {
                write!(f, "触发人机验证 [{}]", term)
            }
            BaikeError::Browser { operation, details } => {
                write!(f, "浏览器{}失败: {}", operation, details)
            }
            BaikeError::Proxy { directory, details } => {
                write!(f, "获取代理失败 [{}]: {}", directory, details)
            }
            BaikeError::Configuration { field, reason } => {
                write!(f, "配置错误 [{}]: {}", field, reason)
            }
            BaikeError::InputValidation { input, reason } => {
                write!(f, "输入验证失败 [{}]: {}", input, reason)
            }
            BaikeError::Internal { source } => {
                write!(f, "内部处理错误: {}", source)
            }
        }
    }
}

impl std::error::Error for BaikeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BaikeError::Internal { source } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Baike CLI 结果类型别名
pub type Result<T> = std::result::Result<T, BaikeError>;

/// 便捷的错误创建宏
#[macro_export]
macro_rules! baike_error {
    (network, $msg:expr) => {
        $crate::error::BaikeError::Network {
            message: $msg.to_string(),
            status_code: None,
        }
    };
    (network, $msg:expr, $code:expr) => {
        $crate::error::BaikeError::Network {
            message: $msg.to_string(),
            status_code: Some($code),
        }
    };
    (html_parse, $details:expr) => {
        $crate::error::BaikeError::HtmlParse {
            details: $details.to_string(),
        }
    };
    (not_found, $term:expr) => {
        $crate::error::BaikeError::PageNotFound {
            term: $term.to_string(),
        }
    };
    (verify, $term:expr) => {
        $crate::error::BaikeError::VerificationChallenge {
            term: $term.to_string(),
        }
    };
    (browser, $op:expr, $details:expr) => {
        $crate::error::BaikeError::Browser {
            operation: $op.to_string(),
            details: $details.to_string(),
        }
    };
    (proxy, $directory:expr, $details:expr) => {
        $crate::error::BaikeError::Proxy {
            directory: $directory.to_string(),
            details: $details.to_string(),
        }
    };
    (config, $field:expr, $reason:expr) => {
        $crate::error::BaikeError::Configuration {
            field: $field.to_string(),
            reason: $reason.to_string(),
        }
    };
    (input_validation, $input:expr, $reason:expr) => {
        $crate::error::BaikeError::InputValidation {
            input: $input.to_string(),
            reason: $reason.to_string(),
        }
    };
}

/// 从anyhow::Error转换为BaikeError
impl From<AnyhowError> for BaikeError {
    fn from(error: AnyhowError) -> Self {
        BaikeError::Internal { source: error }
    }
}

/// 从reqwest::Error转换为BaikeError
impl From<reqwest::Error> for BaikeError {
    fn from(error: reqwest::Error) -> Self {
        let status_code = error.status().map(|s| s.as_u16());
        BaikeError::Network {
            message: error.to_string(),
            status_code,
        }
    }
}

/// 从url::ParseError转换为BaikeError
impl From<url::ParseError> for BaikeError {
    fn from(error: url::ParseError) -> Self {
        BaikeError::InputValidation {
            input: "url".to_string(),
            reason: error.to_string(),
        }
    }
}
