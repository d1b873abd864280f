use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::models::{EducationForm, EducationLevel};

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 浏览器调试端口
    pub browser_debug_port: u16,
    /// 是否启动无头浏览器（否则连接已运行的浏览器）
    pub headless: bool,
    /// 无头模式下的浏览器可执行文件
    pub chrome_executable: Option<String>,
    /// 站点根地址
    pub site_root: String,
    /// 大学 ID 遍历区间（闭区间）
    pub university_id_start: u32,
    pub university_id_end: u32,
    /// 筛选条件
    pub education_forms: Vec<EducationForm>,
    pub education_levels: Vec<EducationLevel>,
    /// 竞争名单下载目录（每次运行在其中建立临时子目录）
    pub download_dir: PathBuf,
    /// 发布端地址，为空时只写入内存（试运行）
    pub publisher_base_url: String,
    pub publish_timeout_secs: u64,
    /// 基础等待时间，各阶段按倍数放大
    pub selector_timeout_ms: u64,
    /// "查看更多" 点击后的等待时间
    pub settle_delay_ms: u64,
    pub download_timeout_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_debug_port: 9222,
            headless: false,
            chrome_executable: None,
            site_root: "https://www.gosuslugi.ru".to_string(),
            university_id_start: 1,
            university_id_end: 1000,
            education_forms: vec![EducationForm::FullTime],
            education_levels: vec![EducationLevel::Bachelor, EducationLevel::Specialist],
            download_dir: PathBuf::from("assets/applicants"),
            publisher_base_url: "http://localhost:8080/publish".to_string(),
            publish_timeout_secs: 30,
            selector_timeout_ms: 1000,
            settle_delay_ms: 1000,
            download_timeout_ms: 30_000,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            browser_debug_port: env_parse("BROWSER_DEBUG_PORT").unwrap_or(default.browser_debug_port),
            headless: env_parse("HEADLESS").unwrap_or(default.headless),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().or(default.chrome_executable),
            site_root: std::env::var("SITE_ROOT").unwrap_or(default.site_root),
            university_id_start: env_parse("UNIVERSITY_ID_START").unwrap_or(default.university_id_start),
            university_id_end: env_parse("UNIVERSITY_ID_END").unwrap_or(default.university_id_end),
            education_forms: std::env::var("EDUCATION_FORMS")
                .ok()
                .and_then(|v| parse_labels(&v, EducationForm::from_label))
                .unwrap_or(default.education_forms),
            education_levels: std::env::var("EDUCATION_LEVELS")
                .ok()
                .and_then(|v| parse_labels(&v, EducationLevel::from_label))
                .unwrap_or(default.education_levels),
            download_dir: std::env::var("DOWNLOAD_DIR").map(PathBuf::from).unwrap_or(default.download_dir),
            publisher_base_url: std::env::var("PUBLISHER_BASE_URL").unwrap_or(default.publisher_base_url),
            publish_timeout_secs: env_parse("PUBLISH_TIMEOUT_SECS").unwrap_or(default.publish_timeout_secs),
            selector_timeout_ms: env_parse("SELECTOR_TIMEOUT_MS").unwrap_or(default.selector_timeout_ms),
            settle_delay_ms: env_parse("SETTLE_DELAY_MS").unwrap_or(default.settle_delay_ms),
            download_timeout_ms: env_parse("DOWNLOAD_TIMEOUT_MS").unwrap_or(default.download_timeout_ms),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(default.verbose_logging),
        }
    }

    /// 从 TOML 文件加载配置，缺省字段使用默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("无法读取配置文件 {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.university_id_start > self.university_id_end {
            return Err(AppError::Config(format!(
                "大学 ID 区间无效: {}..={}",
                self.university_id_start, self.university_id_end
            )));
        }
        if self.site_root.trim().is_empty() {
            return Err(AppError::Config("site_root 不能为空".to_string()));
        }
        Ok(())
    }

    pub fn selector_timeout(&self) -> Duration {
        Duration::from_millis(self.selector_timeout_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_millis(self.download_timeout_ms)
    }

    pub fn publish_timeout(&self) -> Duration {
        Duration::from_secs(self.publish_timeout_secs)
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

/// 解析逗号分隔的站点文本，任意一项无法识别时整体回退到默认值
fn parse_labels<T>(raw: &str, from_label: fn(&str) -> Option<T>) -> Option<Vec<T>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(from_label)
        .collect::<Option<Vec<T>>>()
        .filter(|v| !v.is_empty())
}
