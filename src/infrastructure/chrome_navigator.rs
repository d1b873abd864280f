//! 基于 chromiumoxide 的 `Navigator` 实现

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::browser::{
    SetDownloadBehaviorBehavior, SetDownloadBehaviorParams,
};
use serde_json::Value as JsonValue;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::infrastructure::js_executor::JsExecutor;
use crate::infrastructure::navigator::{Element, Locator, Navigator};

/// 轮询间隔
const POLL_INTERVAL: Duration = Duration::from_millis(100);
/// 后退后等待单页应用重新渲染
const BACK_SETTLE: Duration = Duration::from_millis(300);
/// 未完成下载的临时扩展名
const PARTIAL_DOWNLOAD_EXT: &str = "crdownload";

pub struct ChromeNavigator {
    executor: JsExecutor,
}

impl ChromeNavigator {
    pub fn new(executor: JsExecutor) -> Self {
        Self { executor }
    }

    async fn count(&self, locator: &Locator) -> AppResult<usize> {
        let js = format!("{}.length", locator.to_js());
        self.executor.eval_as::<usize>(js).await
    }

    /// 滚动到第一个匹配元素并点击，返回是否点击成功
    async fn click_first(&self, locator: &Locator, require_visible: bool) -> AppResult<bool> {
        let js = format!(
            r#"(() => {{
                const el = {}[0];
                if (!el) return false;
                if ({} && (el.disabled || el.offsetParent === null)) return false;
                el.scrollIntoView({{ block: 'center' }});
                el.click();
                return true;
            }})()"#,
            locator.to_js(),
            require_visible
        );
        self.executor.eval_as::<bool>(js).await
    }

    async fn set_download_dir(&self, dir: &Path) -> AppResult<()> {
        let params = SetDownloadBehaviorParams::builder()
            .behavior(SetDownloadBehaviorBehavior::Allow)
            .download_path(dir.to_string_lossy().to_string())
            .build()
            .map_err(AppError::Browser)?;
        self.executor.page().execute(params).await?;
        Ok(())
    }
}

impl Navigator for ChromeNavigator {
    async fn goto(&self, url: &str) -> AppResult<()> {
        debug!("导航到: {}", url);
        self.executor.page().goto(url).await?;
        Ok(())
    }

    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> AppResult<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.count(locator).await? > 0 {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(AppError::navigation_timeout(locator.to_string(), timeout));
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn click(&self, locator: &Locator) -> AppResult<()> {
        if self.click_first(locator, false).await? {
            Ok(())
        } else {
            Err(AppError::ElementNotFound {
                selector: locator.to_string(),
            })
        }
    }

    async fn scroll_click(&self, locator: &Locator) -> AppResult<bool> {
        self.click_first(locator, true).await
    }

    async fn query_all(&self, locator: &Locator) -> AppResult<Vec<Element>> {
        let js = format!(
            "{}.map(el => ({{ text: (el.innerText || el.textContent || '').trim(), href: el.getAttribute('href') }}))",
            locator.to_js()
        );
        self.executor.eval_as::<Vec<Element>>(js).await
    }

    async fn text_content(&self, locator: &Locator) -> AppResult<Option<String>> {
        let js = format!(
            "(() => {{ const el = {}[0]; return el ? el.textContent : null; }})()",
            locator.to_js()
        );
        self.executor.eval_as::<Option<String>>(js).await
    }

    async fn evaluate(&self, script: &str) -> AppResult<JsonValue> {
        self.executor.eval(script).await
    }

    async fn download(&self, locator: &Locator, dir: &Path, timeout: Duration) -> AppResult<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        self.set_download_dir(dir).await?;

        let before = list_files(dir).await?;
        self.click(locator).await?;

        let deadline = Instant::now() + timeout;
        loop {
            let finished = list_files(dir)
                .await?
                .into_iter()
                .find(|path| !before.contains(path) && !is_partial(path));
            if let Some(path) = finished {
                debug!("下载完成: {}", path.display());
                return Ok(path);
            }
            if Instant::now() >= deadline {
                return Err(AppError::navigation_timeout(
                    format!("download via {}", locator),
                    timeout,
                ));
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn go_back(&self) -> AppResult<()> {
        self.executor.eval("window.history.back()").await?;
        self.executor.page().wait_for_navigation().await?;
        sleep(BACK_SETTLE).await;
        Ok(())
    }
}

async fn list_files(dir: &Path) -> AppResult<HashSet<PathBuf>> {
    let mut files = HashSet::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            files.insert(entry.path());
        }
    }
    Ok(files)
}

fn is_partial(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some(PARTIAL_DOWNLOAD_EXT)
}
