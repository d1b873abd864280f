use chromiumoxide::error::CdpError;
use thiserror::Error;

/// 应用程序错误类型
///
/// 数据层错误（超时、技术错误页、校验失败）在方向/大学边界被隔离；
/// 基础设施错误（发布、浏览器、配置）一路向上传播。
#[derive(Debug, Error)]
pub enum AppError {
    /// 期望的元素在超时时间内没有出现
    #[error("等待元素超时: {selector} ({timeout_ms}ms)")]
    NavigationTimeout { selector: String, timeout_ms: u64 },

    /// 要点击的元素不存在
    #[error("未找到元素: {selector}")]
    ElementNotFound { selector: String },

    /// 站点返回了通用的技术错误页
    #[error("页面返回技术错误: {url}")]
    TechnicalErrorPage { url: String },

    /// 字段校验失败
    #[error("数据校验失败: {0}")]
    Validation(#[from] ValidationError),

    /// 发布失败
    #[error("发布到 {channel} 失败: {message}")]
    Publish { channel: String, message: String },

    /// 页面状态异常（脚本异常、元素消失、协议返回错误），只影响当前页面
    #[error("页面错误: {0}")]
    PageState(String),

    /// 浏览器连接或会话丢失
    #[error("浏览器错误: {0}")]
    Browser(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 状态机收到了转换表之外的转换
    #[error("非法状态转换: {from} -> {to}")]
    IllegalTransition { from: String, to: String },

    #[error("文件错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("表格解析错误: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// 是否为基础设施错误（不应在方向/大学边界被吞掉）
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            AppError::Publish { .. }
                | AppError::Browser(_)
                | AppError::Config(_)
                | AppError::IllegalTransition { .. }
        )
    }

    pub fn navigation_timeout(selector: impl Into<String>, timeout: std::time::Duration) -> Self {
        AppError::NavigationTimeout {
            selector: selector.into(),
            timeout_ms: timeout.as_millis() as u64,
        }
    }

    pub fn publish_failed(channel: impl Into<String>, message: impl std::fmt::Display) -> Self {
        AppError::Publish {
            channel: channel.into(),
            message: message.to_string(),
        }
    }
}

/// 字段校验错误
///
/// 所有类型化解析函数的失败结果，携带字段名和原始值。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("字段 {field} 为空")]
    Missing { field: &'static str },

    #[error("字段 {field} 无法解析为数字: {raw:?}")]
    NotNumeric { field: &'static str, raw: String },

    #[error("字段 {field} 日期格式不匹配: {raw:?}")]
    BadDate { field: &'static str, raw: String },

    #[error("字段 {field} 取值未知: {raw:?}")]
    UnknownValue { field: &'static str, raw: String },

    #[error("行字段数量不符: 期望 {expected}, 实际 {actual}")]
    RowShape { expected: &'static str, actual: usize },

    #[error("URL 不符合预期格式: {url}")]
    BadUrl { url: String },
}

// ========== 从常见错误类型转换 ==========

impl From<CdpError> for AppError {
    fn from(err: CdpError) -> Self {
        match err {
            CdpError::Timeout => AppError::NavigationTimeout {
                selector: "页面请求".to_string(),
                timeout_ms: 0,
            },
            CdpError::JavascriptException(_)
            | CdpError::NotFound
            | CdpError::ScrollingFailed(_)
            | CdpError::FrameNotFound(_)
            | CdpError::ChromeMessage(_)
            | CdpError::Chrome(_)
            | CdpError::Serde(_)
            | CdpError::InvalidMessage(..)
            | CdpError::DecodeError(_)
            | CdpError::Url(_) => AppError::PageState(err.to_string()),
            // 连接、会话和进程级错误
            _ => AppError::Browser(err.to_string()),
        }
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
