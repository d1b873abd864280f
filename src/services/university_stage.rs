//! 大学阶段：把一个大学 URL 解析为 `University`

use std::time::Duration;

use tracing::info;

use crate::error::{AppError, AppResult, ValidationError};
use crate::infrastructure::Navigator;
use crate::models::{Source, University};
use crate::services::{selectors, urls};

pub struct UniversityStage {
    timeout: Duration,
}

impl UniversityStage {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub async fn resolve<N: Navigator>(&self, navigator: &N, url: &str) -> AppResult<University> {
        let id = urls::extract_university_id(url)?;
        navigator.goto(url).await?;

        if is_technical_error(navigator).await? {
            return Err(AppError::TechnicalErrorPage {
                url: url.to_string(),
            });
        }

        let title_locator = selectors::university_title();
        navigator.wait_for(&title_locator, self.timeout).await?;
        let title = navigator
            .text_content(&title_locator)
            .await?
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ValidationError::Missing { field: "title" })?;

        info!("[大学 {}] ✓ {}", id, title);

        Ok(University {
            id,
            title,
            source: Source::Gosuslugi,
            url: url.to_string(),
        })
    }
}

/// 当前页面是否为站点的技术错误页
pub async fn is_technical_error<N: Navigator>(navigator: &N) -> AppResult<bool> {
    let text = navigator.text_content(&selectors::technical_error()).await?;
    Ok(text
        .map(|t| t.trim() == selectors::TECHNICAL_ERROR_TEXT)
        .unwrap_or(false))
}
