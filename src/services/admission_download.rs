//! 竞争名单下载阶段
//!
//! 站点的导航状态只有一个历史栈，各招生批次必须逐个访问，
//! 每次下载后退回批次列表再处理下一个。

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use crate::error::AppResult;
use crate::infrastructure::Navigator;
use crate::services::{selectors, urls};

pub struct AdmissionDownload {
    site_root: String,
    timeout: Duration,
    /// "下载表格" 按钮出现较慢
    download_button_timeout: Duration,
    download_timeout: Duration,
}

impl AdmissionDownload {
    pub fn new(
        site_root: impl Into<String>,
        timeout: Duration,
        download_button_timeout: Duration,
        download_timeout: Duration,
    ) -> Self {
        Self {
            site_root: site_root.into(),
            timeout,
            download_button_timeout,
            download_timeout,
        }
    }

    /// 在当前方向页面上下载全部招生批次的名单到 `dir`，返回文件路径
    pub async fn download<N: Navigator>(&self, navigator: &N, dir: &Path) -> AppResult<Vec<PathBuf>> {
        let lists_link = selectors::applicant_lists();
        navigator.wait_for(&lists_link, self.timeout).await?;
        navigator.click(&lists_link).await?;
        navigator.wait_for(&selectors::receptions(), self.timeout).await?;

        let wave_urls: Vec<String> = navigator
            .query_all(&selectors::reception_link())
            .await?
            .into_iter()
            .filter_map(|element| element.href)
            .map(|href| urls::absolute_url(&self.site_root, &href))
            .collect();
        info!("找到 {} 个招生批次名单", wave_urls.len());

        let download_button = selectors::download_as_table();
        let mut downloaded = Vec::with_capacity(wave_urls.len());
        for wave_url in wave_urls {
            navigator.goto(&wave_url).await?;
            navigator
                .wait_for(&download_button, self.download_button_timeout)
                .await?;
            let path = navigator
                .download(&download_button, dir, self.download_timeout)
                .await?;
            info!(
                "✓ 名单已保存: {}",
                path.file_name().unwrap_or_default().to_string_lossy()
            );
            downloaded.push(path);
            navigator.go_back().await?;
        }

        Ok(downloaded)
    }
}
