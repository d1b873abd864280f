//! 方向发现阶段：应用筛选条件，翻页直到"查看更多"消失，收集方向 URL

use std::collections::HashSet;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::infrastructure::Navigator;
use crate::models::{EducationForm, EducationLevel};
use crate::services::{selectors, urls};

pub struct DirectionDiscovery {
    site_root: String,
    /// 筛选按钮首次渲染较慢，单独的等待时间
    filter_timeout: Duration,
    /// 提交筛选后等待结果卡片，结果异步加载
    results_timeout: Duration,
    settle_delay: Duration,
}

impl DirectionDiscovery {
    pub fn new(
        site_root: impl Into<String>,
        filter_timeout: Duration,
        results_timeout: Duration,
        settle_delay: Duration,
    ) -> Self {
        Self {
            site_root: site_root.into(),
            filter_timeout,
            results_timeout,
            settle_delay,
        }
    }

    /// 在当前大学页面上筛选并返回全部方向 URL（按发现顺序去重）
    pub async fn discover<N: Navigator>(
        &self,
        navigator: &N,
        forms: &[EducationForm],
        levels: &[EducationLevel],
    ) -> AppResult<Vec<String>> {
        self.apply_filters(navigator, forms, levels).await?;

        match navigator.wait_for(&selectors::program_card(), self.results_timeout).await {
            Ok(()) => {}
            Err(AppError::NavigationTimeout { .. }) => {
                warn!("⚠️ 筛选后没有任何方向");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        }

        let pages = self.expand_all(navigator).await?;
        debug!("共展开 {} 次", pages);

        let links = navigator.query_all(&selectors::program_link()).await?;
        let mut seen = HashSet::new();
        let direction_urls: Vec<String> = links
            .into_iter()
            .filter_map(|element| element.href)
            .filter(|href| !href.is_empty())
            .map(|href| urls::absolute_url(&self.site_root, &href))
            .filter(|url| seen.insert(url.clone()))
            .collect();

        info!("✓ 找到 {} 个方向", direction_urls.len());
        Ok(direction_urls)
    }

    async fn apply_filters<N: Navigator>(
        &self,
        navigator: &N,
        forms: &[EducationForm],
        levels: &[EducationLevel],
    ) -> AppResult<()> {
        let filter_button = selectors::filter_button();
        navigator.wait_for(&filter_button, self.filter_timeout).await?;
        navigator.click(&filter_button).await?;

        for form in forms {
            navigator.click(&selectors::education_form_option(*form)).await?;
            info!("已选择学习形式: {}", form.label());
        }
        for level in levels {
            navigator.click(&selectors::education_level_option(*level)).await?;
            info!("已选择教育层次: {}", level.label());
        }

        navigator.click(&selectors::apply_filters()).await?;
        info!("✓ 筛选条件已提交");
        Ok(())
    }

    /// 反复点击"查看更多"直到按钮消失，返回点击次数
    async fn expand_all<N: Navigator>(&self, navigator: &N) -> AppResult<usize> {
        let see_more = selectors::see_more();
        let mut clicks = 0;
        while navigator.scroll_click(&see_more).await? {
            clicks += 1;
            debug!("展开更多方向 (第 {} 次)", clicks);
            sleep(self.settle_delay).await;
            navigator.evaluate(selectors::SCROLL_DOWN_SCRIPT).await?;
        }
        Ok(clicks)
    }
}
