use serde::{Deserialize, Serialize};

use crate::infrastructure::publisher::{Channel, Message};
use crate::models::enums::EducationForm;

/// 招生方向（专业）
///
/// `(university_id, code)` 唯一。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Direction {
    pub university_id: u32,
    /// 方向代码，例如 `2.20.03.01`
    pub code: String,
    pub title: String,
    pub education_form: EducationForm,
    pub institute: Option<String>,
    pub budget_places: u32,
    pub total_places: u32,
    pub education_price: f64,
}

impl Message for Direction {
    const CHANNEL: Channel = Channel::Directions;

    fn key(&self) -> String {
        format!("{}:{}", self.university_id, self.code)
    }
}
