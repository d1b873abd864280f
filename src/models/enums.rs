//! 站点上出现的枚举取值
//!
//! 站点文本（俄文）到枚举的映射放在静态表里，解析函数只做查表。

use phf::phf_map;
use serde::{Deserialize, Serialize};

/// 大学数据来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Source {
    Gosuslugi,
}

/// 学习形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EducationForm {
    /// Очная
    FullTime,
    /// Очно-заочная
    PartTime,
    /// Заочная
    Extramural,
}

static EDUCATION_FORMS: phf::Map<&'static str, EducationForm> = phf_map! {
    "очная" => EducationForm::FullTime,
    "очное" => EducationForm::FullTime,
    "очно-заочная" => EducationForm::PartTime,
    "очно-заочное" => EducationForm::PartTime,
    "заочная" => EducationForm::Extramural,
    "заочное" => EducationForm::Extramural,
};

impl EducationForm {
    /// 筛选面板上显示的文本
    pub fn label(self) -> &'static str {
        match self {
            EducationForm::FullTime => "Очная",
            EducationForm::PartTime => "Очно-заочная",
            EducationForm::Extramural => "Заочная",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        EDUCATION_FORMS.get(raw.trim().to_lowercase().as_str()).copied()
    }
}

/// 教育层次
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EducationLevel {
    /// Бакалавриат
    Bachelor,
    /// Специалитет
    Specialist,
    /// Базовое высшее
    BasicHigher,
}

static EDUCATION_LEVELS: phf::Map<&'static str, EducationLevel> = phf_map! {
    "бакалавриат" => EducationLevel::Bachelor,
    "специалитет" => EducationLevel::Specialist,
    "базовое высшее" => EducationLevel::BasicHigher,
};

impl EducationLevel {
    pub fn label(self) -> &'static str {
        match self {
            EducationLevel::Bachelor => "Бакалавриат",
            EducationLevel::Specialist => "Специалитет",
            EducationLevel::BasicHigher => "Базовое высшее",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        EDUCATION_LEVELS.get(raw.trim().to_lowercase().as_str()).copied()
    }
}

/// 同意书提交方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmitStatus {
    /// Бумажное
    Paper,
    /// Электронное
    Electronic,
    NotSubmitted,
}

static SUBMIT_STATUSES: phf::Map<&'static str, SubmitStatus> = phf_map! {
    "бумажное" => SubmitStatus::Paper,
    "электронное" => SubmitStatus::Electronic,
    "_" => SubmitStatus::NotSubmitted,
    "—" => SubmitStatus::NotSubmitted,
    "-" => SubmitStatus::NotSubmitted,
    "" => SubmitStatus::NotSubmitted,
};

impl SubmitStatus {
    pub fn from_label(raw: &str) -> Option<Self> {
        SUBMIT_STATUSES.get(raw.trim().to_lowercase().as_str()).copied()
    }
}
