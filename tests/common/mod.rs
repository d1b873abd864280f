//! 内存中的假站点：按选择器返回页面内容，模拟分页、技术错误页和名单导出

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use applicants_parser::config::Config;
use applicants_parser::error::{AppError, AppResult};
use applicants_parser::infrastructure::{Element, Locator, Navigator};
use applicants_parser::services::selectors;
use chromiumoxide::error::CdpError;
use serde_json::{json, Value as JsonValue};
use tokio::time::{sleep, Instant};

pub const SITE_ROOT: &str = "https://vuz.test";

/// 名单行（9 列）
pub fn row(place: u32, id: u64, priority: u32, total: u32) -> String {
    format!(
        "{};{};{};Электронное;{};80 80 80;0;Участвуете в конкурсе;01.09.2024 в 12:30",
        place, id, priority, total
    )
}

#[derive(Debug, Clone)]
pub struct FakeDirection {
    pub code: String,
    pub title: String,
    pub technical_error: bool,
    pub budget: Option<u32>,
    /// 打开页面时浏览器请求超时
    pub load_timeout: bool,
    pub total: u32,
    /// 每个招生批次一份导出文件内容
    pub waves: Vec<String>,
}

impl FakeDirection {
    pub fn new(code: &str) -> Self {
        Self {
            code: code.to_string(),
            title: format!("Профиль {}", code),
            technical_error: false,
            budget: Some(10),
            load_timeout: false,
            total: 50,
            waves: vec![[row(1, 1001, 1, 240), row(2, 1002, 2, 230)].join("\n")],
        }
    }

    pub fn technical_error(mut self) -> Self {
        self.technical_error = true;
        self
    }

    pub fn load_timeout(mut self) -> Self {
        self.load_timeout = true;
        self
    }

    pub fn without_budget(mut self) -> Self {
        self.budget = None;
        self
    }

    pub fn waves(mut self, waves: Vec<String>) -> Self {
        self.waves = waves;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
enum FakePage {
    Blank,
    University,
    Direction(usize),
    Lists(usize),
    Wave(usize, usize),
}

#[derive(Debug)]
struct SiteState {
    current: String,
    history: Vec<String>,
    filters_applied: Option<Instant>,
    revealed: usize,
    see_more_clicks: usize,
    downloads: Vec<PathBuf>,
}

pub struct FakeSite {
    pub university_id: u32,
    pub title: String,
    pub university_error: bool,
    pub directions: Vec<FakeDirection>,
    pub page_size: usize,
    /// 提交筛选后卡片渲染出来所需的时间
    pub cards_delay: Duration,
    state: Mutex<SiteState>,
}

impl FakeSite {
    pub fn new(university_id: u32, directions: Vec<FakeDirection>) -> Self {
        Self {
            university_id,
            title: "Тестовый университет".to_string(),
            university_error: false,
            directions,
            page_size: 3,
            cards_delay: Duration::ZERO,
            state: Mutex::new(SiteState {
                current: "about:blank".to_string(),
                history: Vec::new(),
                filters_applied: None,
                revealed: 0,
                see_more_clicks: 0,
                downloads: Vec::new(),
            }),
        }
    }

    pub fn university_url(&self) -> String {
        format!("{}/vuznavigator/universities/{}", SITE_ROOT, self.university_id)
    }

    pub fn direction_url(&self, index: usize) -> String {
        format!("{}{}", SITE_ROOT, self.direction_href(index))
    }

    fn direction_href(&self, index: usize) -> String {
        format!(
            "/vuznavigator/specialties/{}/2/{}",
            self.directions[index].code, self.university_id
        )
    }

    fn lists_url(&self, index: usize) -> String {
        format!("{}/lists", self.direction_url(index))
    }

    fn wave_href(&self, index: usize, wave: usize) -> String {
        format!("/vuznavigator/competition/{}/{}", self.directions[index].code, wave)
    }

    pub fn see_more_clicks(&self) -> usize {
        self.state.lock().unwrap().see_more_clicks
    }

    pub fn downloads(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().downloads.clone()
    }

    fn page(&self) -> FakePage {
        let current = self.state.lock().unwrap().current.clone();
        if current == self.university_url() {
            return FakePage::University;
        }
        for index in 0..self.directions.len() {
            if current == self.direction_url(index) {
                return FakePage::Direction(index);
            }
            if current == self.lists_url(index) {
                return FakePage::Lists(index);
            }
            for wave in 0..self.directions[index].waves.len() {
                if current == format!("{}{}", SITE_ROOT, self.wave_href(index, wave)) {
                    return FakePage::Wave(index, wave);
                }
            }
        }
        FakePage::Blank
    }

    fn navigate(&self, url: String) {
        let mut state = self.state.lock().unwrap();
        let previous = std::mem::replace(&mut state.current, url);
        state.history.push(previous);
    }

    fn program_links(&self) -> Vec<Element> {
        let state = self.state.lock().unwrap();
        match state.filters_applied {
            Some(applied) if applied.elapsed() >= self.cards_delay => {}
            _ => return Vec::new(),
        }
        let mut links: Vec<Element> = (0..state.revealed.min(self.directions.len()))
            .map(|index| Element {
                text: self.directions[index].title.clone(),
                href: Some(self.direction_href(index)),
            })
            .collect();
        // 同一方向的卡片会在多个专业方向下重复出现
        if let Some(first) = links.first().cloned() {
            links.push(first);
        }
        links
    }

    fn text_of(&self, locator: &Locator) -> Option<String> {
        match self.page() {
            FakePage::University => {
                if *locator == selectors::technical_error() && self.university_error {
                    return Some(selectors::TECHNICAL_ERROR_TEXT.to_string());
                }
                if *locator == selectors::university_title() && !self.university_error {
                    return Some(format!("  {}  ", self.title));
                }
                None
            }
            FakePage::Direction(index) => {
                let direction = &self.directions[index];
                if *locator == selectors::technical_error() {
                    return direction
                        .technical_error
                        .then(|| format!(" {} ", selectors::TECHNICAL_ERROR_TEXT));
                }
                if direction.technical_error {
                    return None;
                }
                if *locator == selectors::profile_title() {
                    Some(direction.title.clone())
                } else if *locator == selectors::education_form_value() {
                    Some("Очная".to_string())
                } else if *locator == selectors::institute() {
                    Some("Институт тестирования".to_string())
                } else if *locator == selectors::budget_places() {
                    direction.budget.map(|b| b.to_string())
                } else if *locator == selectors::total_places() {
                    Some(format!("{} мест", direction.total))
                } else if *locator == selectors::education_price() {
                    Some("120 000 ₽".to_string())
                } else if *locator == selectors::applicant_lists() {
                    Some("Списки подавших документы".to_string())
                } else {
                    None
                }
            }
            FakePage::Lists(_) => (*locator == selectors::receptions()).then(|| "Приём".to_string()),
            FakePage::Wave(_, _) => (*locator == selectors::download_as_table())
                .then(|| "Скачать в виде таблицы".to_string()),
            FakePage::Blank => None,
        }
    }

    fn is_present(&self, locator: &Locator) -> bool {
        if self.text_of(locator).is_some() {
            return true;
        }
        if self.page() != FakePage::University || self.university_error {
            return false;
        }
        if *locator == selectors::filter_button() || *locator == selectors::apply_filters() {
            return true;
        }
        if let Locator::Text { css, .. } = locator {
            if css == selectors::EDUCATION_FORM_OPTION || css == selectors::EDUCATION_LEVEL_OPTION {
                return true;
            }
        }
        if *locator == selectors::program_card() {
            return !self.program_links().is_empty();
        }
        false
    }
}

impl Navigator for FakeSite {
    async fn goto(&self, url: &str) -> AppResult<()> {
        let times_out = (0..self.directions.len())
            .any(|index| self.directions[index].load_timeout && url == self.direction_url(index));
        if times_out {
            return Err(CdpError::Timeout.into());
        }
        self.navigate(url.to_string());
        let mut state = self.state.lock().unwrap();
        if url == self.university_url() {
            state.filters_applied = None;
            state.revealed = 0;
        }
        Ok(())
    }

    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> AppResult<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.is_present(locator) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(AppError::navigation_timeout(locator.to_string(), timeout));
            }
            sleep(Duration::from_millis(2)).await;
        }
    }

    async fn click(&self, locator: &Locator) -> AppResult<()> {
        if !self.is_present(locator) {
            return Err(AppError::ElementNotFound {
                selector: locator.to_string(),
            });
        }
        if *locator == selectors::apply_filters() {
            let mut state = self.state.lock().unwrap();
            state.filters_applied = Some(Instant::now());
            state.revealed = self.page_size;
        } else if *locator == selectors::applicant_lists() {
            if let FakePage::Direction(index) = self.page() {
                self.navigate(self.lists_url(index));
            }
        }
        Ok(())
    }

    async fn scroll_click(&self, locator: &Locator) -> AppResult<bool> {
        if *locator != selectors::see_more() || self.page() != FakePage::University {
            return Ok(false);
        }
        let mut state = self.state.lock().unwrap();
        if state.filters_applied.is_none() || state.revealed >= self.directions.len() {
            return Ok(false);
        }
        state.revealed += self.page_size;
        state.see_more_clicks += 1;
        Ok(true)
    }

    async fn query_all(&self, locator: &Locator) -> AppResult<Vec<Element>> {
        if *locator == selectors::program_link() {
            return Ok(self.program_links());
        }
        if *locator == selectors::reception_link() {
            if let FakePage::Lists(index) = self.page() {
                return Ok((0..self.directions[index].waves.len())
                    .map(|wave| Element {
                        text: format!("Приём {}", wave + 1),
                        href: Some(self.wave_href(index, wave)),
                    })
                    .collect());
            }
        }
        Ok(Vec::new())
    }

    async fn text_content(&self, locator: &Locator) -> AppResult<Option<String>> {
        Ok(self.text_of(locator))
    }

    async fn evaluate(&self, script: &str) -> AppResult<JsonValue> {
        if script == selectors::FETCH_PROFILES_SCRIPT {
            if let FakePage::Direction(index) = self.page() {
                return Ok(json!(["", self.directions[index].title, "Другой профиль"]));
            }
            return Ok(json!([]));
        }
        Ok(JsonValue::Null)
    }

    async fn download(&self, locator: &Locator, dir: &Path, timeout: Duration) -> AppResult<PathBuf> {
        let FakePage::Wave(index, wave) = self.page() else {
            return Err(AppError::navigation_timeout(locator.to_string(), timeout));
        };
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(format!("{}-{}.csv", self.directions[index].code, wave));
        tokio::fs::write(&path, &self.directions[index].waves[wave]).await?;
        self.state.lock().unwrap().downloads.push(path.clone());
        Ok(path)
    }

    async fn go_back(&self) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(previous) = state.history.pop() {
            state.current = previous;
        }
        Ok(())
    }
}

/// 测试配置：短超时，下载目录在临时目录中
pub fn test_config(download_dir: &Path) -> Config {
    Config {
        site_root: SITE_ROOT.to_string(),
        download_dir: download_dir.to_path_buf(),
        publisher_base_url: String::new(),
        selector_timeout_ms: 5,
        settle_delay_ms: 0,
        download_timeout_ms: 50,
        ..Config::default()
    }
}
