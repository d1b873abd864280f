//! URL 生成与解析

use std::ops::RangeInclusive;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::ValidationError;

fn university_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/vuznavigator/universities/(\d+)/?$").expect("valid regex"))
}

/// 按 ID 顺序生成大学页面 URL
pub fn generate_university_urls(
    site_root: &str,
    ids: RangeInclusive<u32>,
) -> impl Iterator<Item = String> + '_ {
    let root = site_root.trim_end_matches('/');
    ids.map(move |id| format!("{}/vuznavigator/universities/{}", root, id))
}

/// 从大学 URL 中取出 ID
pub fn extract_university_id(url: &str) -> Result<u32, ValidationError> {
    university_id_regex()
        .captures(url.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| ValidationError::BadUrl {
            url: url.to_string(),
        })
}

/// 从方向 URL 中取出方向代码
///
/// `https://www.gosuslugi.ru/vuznavigator/specialties/2.20.03.01/2/43` → `2.20.03.01`
pub fn extract_direction_code(url: &str) -> Result<String, ValidationError> {
    let parts: Vec<&str> = url.trim_matches('/').split('/').collect();
    parts
        .iter()
        .position(|part| *part == "specialties")
        .and_then(|index| parts.get(index + 1))
        .filter(|code| !code.is_empty())
        .map(|code| code.to_string())
        .ok_or_else(|| ValidationError::BadUrl {
            url: url.to_string(),
        })
}

/// 把站内相对链接补全为绝对 URL
pub fn absolute_url(site_root: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    let root = site_root.trim_end_matches('/');
    if href.starts_with('/') {
        format!("{}{}", root, href)
    } else {
        format!("{}/{}", root, href)
    }
}
