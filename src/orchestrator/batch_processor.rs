//! 批量大学处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：连接或启动浏览器、创建导航器和发布端
//! 2. **批量遍历**：按配置的 ID 区间生成大学 URL，逐个交给 `Orchestrator`
//! 3. **失败隔离**：单个大学的数据错误只记录，不影响后续大学
//! 4. **全局统计**：汇总所有大学的 `RunSummary`
//!
//! 浏览器只有一个页面，大学之间严格串行。

use anyhow::Result;
use chromiumoxide::Browser;
use tracing::{error, info, warn};

use crate::browser;
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::{
    ChromeNavigator, HttpPublisher, JsExecutor, MemoryPublisher, Message, Publisher,
};
use crate::orchestrator::university_processor::{Orchestrator, RunSummary};
use crate::services::urls;
use crate::utils::logging;

/// 运行时选择的发布端
pub enum AppPublisher {
    Http(HttpPublisher),
    /// 未配置下游地址时使用，只保留在内存中
    Memory(MemoryPublisher),
}

impl AppPublisher {
    pub fn from_config(config: &Config) -> AppResult<Self> {
        if config.publisher_base_url.trim().is_empty() {
            warn!("⚠️ 未配置发布地址，结果只保留在内存中");
            return Ok(AppPublisher::Memory(MemoryPublisher::new()));
        }
        Ok(AppPublisher::Http(HttpPublisher::new(
            config.publisher_base_url.clone(),
            config.publish_timeout(),
        )?))
    }
}

impl Publisher for AppPublisher {
    async fn publish<M: Message + Sync>(&self, message: &M) -> AppResult<()> {
        match self {
            AppPublisher::Http(p) => p.publish(message).await,
            AppPublisher::Memory(p) => p.publish(message).await,
        }
    }

    async fn publish_batch<M: Message + Sync>(&self, messages: &[M]) -> AppResult<()> {
        match self {
            AppPublisher::Http(p) => p.publish_batch(messages).await,
            AppPublisher::Memory(p) => p.publish_batch(messages).await,
        }
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    _browser: Browser,
    orchestrator: Orchestrator<ChromeNavigator, AppPublisher>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        logging::log_startup(&config);

        let (browser, page) = if config.headless {
            browser::launch_headless_browser(config.chrome_executable.as_deref()).await?
        } else {
            browser::connect_to_browser(config.browser_debug_port).await?
        };

        let navigator = ChromeNavigator::new(JsExecutor::new(page));
        let publisher = AppPublisher::from_config(&config)?;
        let orchestrator = Orchestrator::new(&config, navigator, publisher);

        Ok(Self {
            config,
            _browser: browser,
            orchestrator,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunSummary> {
        let range = self.config.university_id_start..=self.config.university_id_end;
        let university_urls: Vec<String> =
            urls::generate_university_urls(&self.config.site_root, range).collect();
        info!("✓ 共 {} 所大学待处理", university_urls.len());

        let mut total = RunSummary::default();
        let mut failed_universities = 0;

        for url in &university_urls {
            logging::log_university_start(url);
            match self
                .orchestrator
                .run(url, &self.config.education_forms, &self.config.education_levels)
                .await
            {
                Ok(summary) => {
                    let id = urls::extract_university_id(url).unwrap_or_default();
                    logging::log_university_complete(id, &summary);
                    total.merge(summary);
                }
                Err(e) if e.is_infrastructure() => {
                    error!("❌ 基础设施错误，停止运行: {}", e);
                    logging::print_final_stats(&total, failed_universities + 1);
                    return Err(e.into());
                }
                Err(e) => {
                    error!("❌ 大学处理失败: {} | {}", e, url);
                    failed_universities += 1;
                }
            }
        }

        logging::print_final_stats(&total, failed_universities);
        Ok(total)
    }
}
