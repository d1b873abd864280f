//! 方向处理上下文
//!
//! 封装"我正在处理哪所大学的第几个方向"这一信息

use std::fmt::Display;

/// 方向处理上下文
#[derive(Debug, Clone)]
pub struct DirectionCtx {
    pub university_id: u32,
    /// 方向在发现列表中的序号（从1开始）
    pub index: usize,
    pub total: usize,
    pub url: String,
    /// 从 URL 中解析出的方向代码
    pub code: String,
}

impl DirectionCtx {
    pub fn new(university_id: u32, index: usize, total: usize, url: String, code: String) -> Self {
        Self {
            university_id,
            index,
            total,
            url,
            code,
        }
    }
}

impl Display for DirectionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[大学 {} 方向 {}/{} #{}]",
            self.university_id, self.index, self.total, self.code
        )
    }
}
