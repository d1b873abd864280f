//! 页面选择器与脚本
//!
//! 站点是 Angular 单页应用，文本匹配的控件用 `Locator::Text` 表示。

use crate::infrastructure::Locator;
use crate::models::{EducationForm, EducationLevel};

/// 技术错误页上显示的文本
pub const TECHNICAL_ERROR_TEXT: &str = "Техническая ошибка";

pub const TECHNICAL_ERROR_CONTAINER: &str = "div.text-center";
pub const UNIVERSITY_TITLE_XPATH: &str = "//span[@class='title-h3']";
pub const FILTER_BUTTON: &str = "button.filter-button";
pub const EDUCATION_FORM_OPTION: &str = "form[formgroupname='educationForms'] div.text-plain";
pub const EDUCATION_LEVEL_OPTION: &str = "form[formgroupname='educationLevels'] div.text-plain";
pub const EDUCATION_PROGRAM_CARD: &str = "app-education-program-card";
pub const EDUCATION_PROGRAM_LINK: &str = "app-education-program-card a.education-program-card[href]";
pub const SEE_MORE_BUTTON: &str = "button.white.button";
pub const PROFILE_TITLE: &str = "h4.title-h4";
pub const EDUCATION_FORM_VALUE_XPATH: &str = "//div[contains(@class, 'small-text') and contains(@class, 'gray') and contains(text(), 'Форма обучения')]/following-sibling::div[contains(@class, 'text-plain')][1]";
pub const INSTITUTE: &str = "div.text-plain.mb-24.ng-star-inserted";
pub const BUDGET_PLACES_XPATH: &str = "//li[.//div[contains(@class, 'gray') and text()='Основные места']]//div[contains(@class, 'bold')]";
pub const TOTAL_PLACES: &str = "div.header-places div.small-text";
pub const EDUCATION_PRICE: &str = "div.title-h3.mb-8";
pub const RECEPTIONS: &str = "ul.shadow-block";
pub const RECEPTION_LINK: &str = "ul.shadow-block li.list-divider a.link-plain";

/// 返回所有专业方向（profile）标题，第一个为准
pub const FETCH_PROFILES_SCRIPT: &str = r#"(() => Array.from(document.querySelectorAll('lib-expansion-panel'))
    .map(el => {
        const root = el.shadowRoot || el;
        const title = root.querySelector('h4.title-h4');
        return title ? title.textContent.trim() : null;
    })
    .filter(Boolean))()"#;

pub const SCROLL_DOWN_SCRIPT: &str = "window.scrollBy(0, 500)";

pub fn technical_error() -> Locator {
    Locator::css(TECHNICAL_ERROR_CONTAINER)
}

pub fn university_title() -> Locator {
    Locator::xpath(UNIVERSITY_TITLE_XPATH)
}

pub fn filter_button() -> Locator {
    Locator::css(FILTER_BUTTON)
}

pub fn education_form_option(form: EducationForm) -> Locator {
    Locator::text(EDUCATION_FORM_OPTION, form.label())
}

pub fn education_level_option(level: EducationLevel) -> Locator {
    Locator::text(EDUCATION_LEVEL_OPTION, level.label())
}

pub fn apply_filters() -> Locator {
    Locator::text("button", "Применить")
}

pub fn program_card() -> Locator {
    Locator::css(EDUCATION_PROGRAM_CARD)
}

pub fn program_link() -> Locator {
    Locator::css(EDUCATION_PROGRAM_LINK)
}

pub fn see_more() -> Locator {
    Locator::text(SEE_MORE_BUTTON, "Посмотреть ещё")
}

pub fn profile_title() -> Locator {
    Locator::css(PROFILE_TITLE)
}

pub fn education_form_value() -> Locator {
    Locator::xpath(EDUCATION_FORM_VALUE_XPATH)
}

pub fn institute() -> Locator {
    Locator::css(INSTITUTE)
}

pub fn budget_places() -> Locator {
    Locator::xpath(BUDGET_PLACES_XPATH)
}

pub fn total_places() -> Locator {
    Locator::css(TOTAL_PLACES)
}

pub fn education_price() -> Locator {
    Locator::css(EDUCATION_PRICE)
}

pub fn applicant_lists() -> Locator {
    Locator::text("a", "Списки подавших документы")
}

pub fn receptions() -> Locator {
    Locator::css(RECEPTIONS)
}

pub fn reception_link() -> Locator {
    Locator::css(RECEPTION_LINK)
}

pub fn download_as_table() -> Locator {
    Locator::text("button", "Скачать в виде таблицы")
}
