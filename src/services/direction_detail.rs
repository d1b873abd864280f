//! 方向详情阶段：解析单个方向页面
//!
//! 技术错误页视为持续状态：后退并跳过，不重试。

use std::time::Duration;

use serde_json::Value as JsonValue;
use tracing::{info, warn};

use crate::error::{AppError, AppResult, ValidationError};
use crate::infrastructure::Navigator;
use crate::models::{Direction, EducationForm};
use crate::services::row_normalizer::{parse_places, parse_price};
use crate::services::university_stage::is_technical_error;
use crate::services::{selectors, urls};

/// 方向解析结果
#[derive(Debug, Clone, PartialEq)]
pub enum DirectionOutcome {
    Resolved(Direction),
    Skipped { reason: String },
}

pub struct DirectionDetail {
    timeout: Duration,
    /// 预算名额控件经常缺失，等待更久后记为 0
    budget_timeout: Duration,
}

impl DirectionDetail {
    pub fn new(timeout: Duration, budget_timeout: Duration) -> Self {
        Self {
            timeout,
            budget_timeout,
        }
    }

    pub async fn resolve<N: Navigator>(
        &self,
        navigator: &N,
        university_id: u32,
        url: &str,
    ) -> AppResult<DirectionOutcome> {
        let code = urls::extract_direction_code(url)?;
        navigator.goto(url).await?;

        if is_technical_error(navigator).await? {
            warn!("[方向 {}] ⚠️ 页面返回技术错误，跳过", code);
            navigator.go_back().await?;
            return Ok(DirectionOutcome::Skipped {
                reason: AppError::TechnicalErrorPage {
                    url: url.to_string(),
                }
                .to_string(),
            });
        }

        let profile_title = selectors::profile_title();
        navigator.wait_for(&profile_title, self.timeout).await?;

        let profiles = navigator.evaluate(selectors::FETCH_PROFILES_SCRIPT).await?;
        let title = first_profile(&profiles).ok_or(ValidationError::Missing { field: "title" })?;

        // 展开第一个专业面板，详情控件才会渲染
        navigator.click(&profile_title).await?;

        let education_form_raw = navigator
            .text_content(&selectors::education_form_value())
            .await?
            .ok_or(ValidationError::Missing {
                field: "education_form",
            })?;
        let education_form =
            EducationForm::from_label(&education_form_raw).ok_or_else(|| ValidationError::UnknownValue {
                field: "education_form",
                raw: education_form_raw.clone(),
            })?;

        let institute = navigator
            .text_content(&selectors::institute())
            .await?
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let budget_places = self.budget_places(navigator, &code).await?;

        let total_places_raw = navigator
            .text_content(&selectors::total_places())
            .await?
            .ok_or(ValidationError::Missing {
                field: "total_places",
            })?;
        let total_places = parse_places(&total_places_raw, "total_places")?;

        let price_raw = navigator
            .text_content(&selectors::education_price())
            .await?
            .ok_or(ValidationError::Missing {
                field: "education_price",
            })?;
        let education_price = parse_price(&price_raw)?;

        info!(
            "[方向 {}] ✓ {} (预算 {} / 总计 {})",
            code, title, budget_places, total_places
        );

        Ok(DirectionOutcome::Resolved(Direction {
            university_id,
            code,
            title,
            education_form,
            institute,
            budget_places,
            total_places,
            education_price,
        }))
    }

    /// 预算名额；控件超时记为 0
    async fn budget_places<N: Navigator>(&self, navigator: &N, code: &str) -> AppResult<u32> {
        let locator = selectors::budget_places();
        match navigator.wait_for(&locator, self.budget_timeout).await {
            Ok(()) => {}
            Err(AppError::NavigationTimeout { .. }) => {
                info!("[方向 {}] 未找到预算名额，记为 0", code);
                return Ok(0);
            }
            Err(e) => return Err(e),
        }
        match navigator.text_content(&locator).await? {
            Some(raw) => Ok(parse_places(&raw, "budget_places")?),
            None => Ok(0),
        }
    }
}

fn first_profile(profiles: &JsonValue) -> Option<String> {
    profiles
        .as_array()?
        .iter()
        .filter_map(JsonValue::as_str)
        .map(str::trim)
        .find(|title| !title.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_non_empty_profile_is_canonical() {
        assert_eq!(
            first_profile(&json!(["", " Управление рисками ", "Защита в ЧС"])),
            Some("Управление рисками".to_string())
        );
        assert_eq!(first_profile(&json!([])), None);
        assert_eq!(first_profile(&JsonValue::Null), None);
    }
}
