//! 页面导航能力 - 基础设施层
//!
//! 各阶段只依赖 `Navigator`，不直接接触浏览器。整个运行期间只有一个
//! 实现实例（一个页面），由编排层在构造时注入。

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::AppResult;

/// 元素定位方式
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// CSS 选择器
    Css(String),
    /// 匹配 CSS 且可见文本包含 `text` 的元素
    Text { css: String, text: String },
    /// XPath 表达式
    XPath(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn text(css: impl Into<String>, text: impl Into<String>) -> Self {
        Locator::Text {
            css: css.into(),
            text: text.into(),
        }
    }

    pub fn xpath(expr: impl Into<String>) -> Self {
        Locator::XPath(expr.into())
    }

    /// 编译为返回 `Element[]` 的 JS 表达式
    pub fn to_js(&self) -> String {
        match self {
            Locator::Css(selector) => {
                format!("Array.from(document.querySelectorAll({}))", js_string(selector))
            }
            Locator::Text { css, text } => format!(
                "Array.from(document.querySelectorAll({})).filter(el => (el.innerText || el.textContent || '').includes({}))",
                js_string(css),
                js_string(text)
            ),
            Locator::XPath(expr) => format!(
                r#"(() => {{
                    const snapshot = document.evaluate({}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null);
                    const nodes = [];
                    for (let i = 0; i < snapshot.snapshotLength; i++) nodes.push(snapshot.snapshotItem(i));
                    return nodes;
                }})()"#,
                js_string(expr)
            ),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(selector) => write!(f, "{}", selector),
            Locator::Text { css, text } => write!(f, "{}:has-text('{}')", css, text),
            Locator::XPath(expr) => write!(f, "xpath={}", expr),
        }
    }
}

fn js_string(value: &str) -> String {
    JsonValue::String(value.to_string()).to_string()
}

/// `query_all` 返回的元素快照
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Element {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub href: Option<String>,
}

/// 页面导航能力
///
/// 所有方法都是挂起点；超时由调用方按调用点传入。
#[allow(async_fn_in_trait)]
pub trait Navigator {
    /// 打开 URL 并等待加载完成
    async fn goto(&self, url: &str) -> AppResult<()>;

    /// 等待元素出现，超时返回 `AppError::NavigationTimeout`
    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> AppResult<()>;

    /// 点击第一个匹配元素，不存在时返回 `AppError::ElementNotFound`
    async fn click(&self, locator: &Locator) -> AppResult<()>;

    /// 滚动到元素并点击；元素不存在或不可交互时返回 `false`
    async fn scroll_click(&self, locator: &Locator) -> AppResult<bool>;

    async fn query_all(&self, locator: &Locator) -> AppResult<Vec<Element>>;

    /// 第一个匹配元素的文本，不存在时为 `None`
    async fn text_content(&self, locator: &Locator) -> AppResult<Option<String>>;

    async fn evaluate(&self, script: &str) -> AppResult<JsonValue>;

    /// 点击下载控件并把文件保存到 `dir`，返回文件路径
    async fn download(&self, locator: &Locator, dir: &Path, timeout: Duration) -> AppResult<PathBuf>;

    async fn go_back(&self) -> AppResult<()>;
}
